use std::sync::Mutex;

use anyhow::{Context as _, Result};
use rand::Rng;
use serenity::all::{Attachment, Message, UserId};
use serenity::async_trait;

use crate::describer::ImageDescriber;
use crate::reminder;
use crate::stats::StatsStore;

/// Content types treated as images. Compared verbatim, so `image/PNG` or
/// `image/png; charset=...` don't count.
pub const IMAGE_CONTENT_TYPES: [&str; 5] = [
    "image/png",
    "image/jpeg",
    "image/aviv",
    "image/webp",
    "image/svg+xml",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentInfo {
    pub url: String,
    pub content_type: Option<String>,
    pub description: Option<String>,
}

impl AttachmentInfo {
    /// An image without alt text.
    pub fn is_qualifying(&self) -> bool {
        let is_image = self
            .content_type
            .as_deref()
            .is_some_and(|content_type| IMAGE_CONTENT_TYPES.contains(&content_type));
        let has_description = self
            .description
            .as_deref()
            .is_some_and(|description| !description.is_empty());

        is_image && !has_description
    }
}

impl From<&Attachment> for AttachmentInfo {
    fn from(attachment: &Attachment) -> Self {
        Self {
            url: attachment.url.clone(),
            content_type: attachment.content_type.clone(),
            description: attachment.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Bot accounts, including this bot, are never reminded
    pub author_is_bot: bool,
    pub attachments: Vec<AttachmentInfo>,
}

impl InboundMessage {
    pub fn from_message(msg: &Message, current_user: UserId) -> Self {
        Self {
            author_is_bot: msg.author.bot || msg.author.id == current_user,
            attachments: msg.attachments.iter().map(AttachmentInfo::from).collect(),
        }
    }
}

pub fn first_qualifying(attachments: &[AttachmentInfo]) -> Option<&AttachmentInfo> {
    attachments.iter().find(|attachment| attachment.is_qualifying())
}

/// Where a composed reminder ends up.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send_reminder(&self, text: String) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    IgnoredAuthor,
    NothingToRemind,
    Reminded { count: u64 },
}

/// Watches messages for images without alt text and answers the first one
/// with a generated description.
pub struct AltTextMonitor<D, S, R> {
    describer: D,
    stats: S,
    rng: Mutex<R>,
}

impl<D, S, R> AltTextMonitor<D, S, R>
where
    D: ImageDescriber,
    S: StatsStore,
    R: Rng + Send,
{
    pub fn new(describer: D, stats: S, rng: R) -> Self {
        Self {
            describer,
            stats,
            rng: Mutex::new(rng),
        }
    }

    pub fn stats(&self) -> &S {
        &self.stats
    }

    /// Sends at most one reminder, for the first qualifying attachment.
    pub async fn handle(
        &self,
        message: &InboundMessage,
        reply: &dyn ReplySink,
    ) -> Result<Outcome> {
        if message.author_is_bot {
            return Ok(Outcome::IgnoredAuthor);
        }

        let Some(attachment) = first_qualifying(&message.attachments) else {
            return Ok(Outcome::NothingToRemind);
        };

        let count = self.stats.increment().context("Failed to record reminder")?;

        let description = self
            .describer
            .describe(&attachment.url)
            .await
            .context("Failed to describe image")?;

        let text = {
            let mut rng = self.rng.lock().unwrap();
            reminder::compose(&mut *rng, &description)
        };

        reply
            .send_reminder(text)
            .await
            .context("Failed to send reminder")?;

        Ok(Outcome::Reminded { count })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::describer::DescribeError;
    use crate::reminder::{REMINDER_TEXTS, TUTORIAL};

    const DESCRIPTION: &str = "A hand-drawn chart showing coffee consumption rising on Mondays.";

    /// Fails for any URL containing "broken".
    #[derive(Default)]
    struct FakeDescriber {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ImageDescriber for FakeDescriber {
        async fn describe(&self, image_url: &str) -> Result<String, DescribeError> {
            self.calls.lock().unwrap().push(image_url.to_string());
            if image_url.contains("broken") {
                Err(DescribeError::EmptyResponse)
            } else {
                Ok(DESCRIPTION.to_string())
            }
        }
    }

    #[derive(Default)]
    struct MemoryStats {
        count: AtomicU64,
    }

    impl StatsStore for MemoryStats {
        fn read(&self) -> Result<u64> {
            Ok(self.count.load(Ordering::SeqCst))
        }

        fn increment(&self) -> Result<u64> {
            Ok(self.count.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    #[derive(Default)]
    struct SpySink {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ReplySink for SpySink {
        async fn send_reminder(&self, text: String) -> Result<()> {
            self.sent.lock().unwrap().push(text);
            Ok(())
        }
    }

    type TestMonitor = AltTextMonitor<FakeDescriber, MemoryStats, StdRng>;

    fn monitor(describer: FakeDescriber, starting_count: u64) -> TestMonitor {
        let stats = MemoryStats {
            count: AtomicU64::new(starting_count),
        };
        AltTextMonitor::new(describer, stats, StdRng::seed_from_u64(3))
    }

    fn attachment(
        url: &str,
        content_type: Option<&str>,
        description: Option<&str>,
    ) -> AttachmentInfo {
        AttachmentInfo {
            url: url.to_string(),
            content_type: content_type.map(str::to_string),
            description: description.map(str::to_string),
        }
    }

    fn png(url: &str) -> AttachmentInfo {
        attachment(url, Some("image/png"), None)
    }

    fn message(attachments: Vec<AttachmentInfo>) -> InboundMessage {
        InboundMessage {
            author_is_bot: false,
            attachments,
        }
    }

    #[test]
    fn qualifying_requires_known_image_type() {
        for content_type in IMAGE_CONTENT_TYPES {
            assert!(attachment("u", Some(content_type), None).is_qualifying());
        }

        for content_type in [
            "text/plain",
            "image/gif",
            "image/PNG",
            "image/png; charset=binary",
            "image/avif",
        ] {
            assert!(!attachment("u", Some(content_type), None).is_qualifying());
        }
        assert!(!attachment("u", None, None).is_qualifying());
    }

    #[test]
    fn existing_description_disqualifies() {
        for content_type in IMAGE_CONTENT_TYPES {
            assert!(!attachment("u", Some(content_type), Some("A dog")).is_qualifying());
        }
        assert!(attachment("u", Some("image/jpeg"), Some("")).is_qualifying());
    }

    #[test]
    fn first_qualifying_skips_non_matches() {
        let attachments = vec![
            attachment("notes", Some("text/plain"), None),
            attachment("described", Some("image/png"), Some("A cat")),
            png("first"),
            png("second"),
        ];

        assert_eq!(
            first_qualifying(&attachments).map(|a| a.url.as_str()),
            Some("first")
        );
        assert_eq!(first_qualifying(&attachments[..2]), None);
    }

    #[tokio::test]
    async fn single_png_gets_one_reminder() {
        let monitor = monitor(FakeDescriber::default(), 41);
        let sink = SpySink::default();

        let outcome = monitor
            .handle(&message(vec![png("https://cdn.example/a.png")]), &sink)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Reminded { count: 42 });
        assert_eq!(monitor.stats().read().unwrap(), 42);
        assert_eq!(
            *monitor.describer.calls.lock().unwrap(),
            vec!["https://cdn.example/a.png".to_string()]
        );

        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(REMINDER_TEXTS.iter().any(|lead| sent[0].starts_with(lead)));
        assert!(sent[0].contains(DESCRIPTION));
        assert!(sent[0].contains(TUTORIAL));
    }

    #[tokio::test]
    async fn two_pngs_still_get_one_reminder() {
        let monitor = monitor(FakeDescriber::default(), 0);
        let sink = SpySink::default();

        let outcome = monitor
            .handle(&message(vec![png("first"), png("second")]), &sink)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Reminded { count: 1 });
        assert_eq!(monitor.stats().read().unwrap(), 1);
        assert_eq!(
            *monitor.describer.calls.lock().unwrap(),
            vec!["first".to_string()]
        );
        assert_eq!(sink.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn plain_text_attachment_is_ignored() {
        let monitor = monitor(FakeDescriber::default(), 5);
        let sink = SpySink::default();

        let outcome = monitor
            .handle(
                &message(vec![attachment("notes.txt", Some("text/plain"), None)]),
                &sink,
            )
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::NothingToRemind);
        assert_eq!(monitor.stats().read().unwrap(), 5);
        assert!(monitor.describer.calls.lock().unwrap().is_empty());
        assert!(sink.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn bot_authors_are_never_processed() {
        let monitor = monitor(FakeDescriber::default(), 0);
        let sink = SpySink::default();
        let from_bot = InboundMessage {
            author_is_bot: true,
            attachments: vec![png("bot.png")],
        };

        let outcome = monitor.handle(&from_bot, &sink).await.unwrap();

        assert_eq!(outcome, Outcome::IgnoredAuthor);
        assert_eq!(monitor.stats().read().unwrap(), 0);
        assert!(monitor.describer.calls.lock().unwrap().is_empty());
        assert!(sink.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn describer_failure_sends_nothing_and_next_message_still_works() {
        let monitor = monitor(FakeDescriber::default(), 0);
        let sink = SpySink::default();

        let err = monitor
            .handle(&message(vec![png("broken.png")]), &sink)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to describe image"));
        assert!(sink.sent.lock().unwrap().is_empty());

        let outcome = monitor
            .handle(&message(vec![png("fine.png")]), &sink)
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Reminded { .. }));
        assert_eq!(sink.sent.lock().unwrap().len(), 1);
    }
}
