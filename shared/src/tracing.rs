use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Builds the log filter for a bot package.
///
/// `RUST_LOG` wins when set; otherwise the bot logs at info and serenity's
/// gateway chatter is limited to warnings.
pub fn env_filter(package: &str) -> Result<EnvFilter> {
    let default_directive = format!("{}=info", package.replace('-', "_"));

    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return Ok(EnvFilter::builder()
            .with_default_directive(default_directive.parse()?)
            .from_env_lossy());
    }

    Ok(EnvFilter::new(default_directive).add_directive("serenity=warn".parse()?))
}

/// Initialize tracing using the calling crate's package name.
#[macro_export]
macro_rules! init_tracing {
    () => {{
        use $crate::__private::tracing_subscriber::{
            fmt::format::FmtSpan, layer::SubscriberExt as _, util::SubscriberInitExt as _,
        };

        let filter = $crate::tracing::env_filter(env!("CARGO_PKG_NAME"))?;

        match $crate::__private::tracing_journald::layer() {
            Ok(journald_layer) => $crate::__private::tracing_subscriber::registry()
                .with(filter)
                .with(journald_layer)
                .init(),
            Err(_) => $crate::__private::tracing_subscriber::registry()
                .with(filter)
                .with(
                    $crate::__private::tracing_subscriber::fmt::layer()
                        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE),
                )
                .init(),
        };

        Ok::<(), $crate::__private::anyhow::Error>(())
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_targets_package() {
        if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
            return;
        }

        let filter = env_filter("alt-text-bot").unwrap().to_string();
        assert!(filter.contains("alt_text_bot=info"));
        assert!(filter.contains("serenity=warn"));
    }
}
