use indoc::formatdoc;
use rand::Rng;

pub const REMINDER_TEXTS: [&str; 5] = [
    "Good day! You just posted an image without a description. This makes it impossible for blind or low vision users to understand its content.",
    "Hello! This is a reminder that you just posted an image without a description. This makes it impossible for blind or low vision users to fully participate on Discord.",
    "Hey! The image you have just posted does not have a description. This excludes blind or low vision users from fully participating in this community.",
    "Hi! It looks like you forgot to include a description with your image. This makes participation easier and more pleasant for blind or low vision users.",
    "Hey! To make it easier for blind or low vision users to participate on Discord, please include a description with your image. You seem to have forgotten to do this.",
];

pub const TUTORIAL: &str = "Please, if possible, **re-post your image with an alt-text.** [A tutorial can be found here.](https://support.discord.com/hc/en-us/articles/211866427-How-do-I-upload-images-and-GIFs-)";

pub const TIP_PREFIX: &str = ":information_source: **A tip for your alt texts:**";

pub const TIPS: [&str; 12] = [
    "Keep it short, but get verbose when necessary. Most of the time, one or two sentences are enough.",
    "Describe the relations and interactions of objects in the image.",
    "Include colors in your description.",
    "If there is text in your image, copy it to the description.",
    "Do not interpret the image in your description. Include only what you can visually see.",
    "Ignore irrelevant details in your description.",
    "Describe the setting or style of the image.",
    "Include the type of the image, e.g. \"Drawing\", \"Photo\", \"Painting\", \"Sketch\", etc.",
    "If the image contains visualized data in a chart or table, interpret the data verbally.",
    "Refrain from using formatting in the description. Use only plain text.",
    "AI-generated image descriptions are not a suitable substitute for your own words.",
    "Describe the context of the image and your post.",
];

/// Builds the reminder embed text around a generated description.
///
/// Every other reminder on average carries one tip, so people pick up good
/// alt text habits over time without every message turning into a lecture.
pub fn compose<R: Rng + ?Sized>(rng: &mut R, description: &str) -> String {
    let lead = pick(rng, &REMINDER_TEXTS);

    let mut reminder = formatdoc! {"
        {lead}
         Here is an AI-generated description for now:
         {description}

        {tutorial}",
        lead = lead,
        description = description,
        tutorial = TUTORIAL,
    };

    if rng.random_bool(0.5) {
        let tip = pick(rng, &TIPS);
        reminder.push_str(&format!("\n\n{TIP_PREFIX} {tip}"));
    }

    reminder
}

fn pick<'a, R: Rng + ?Sized, const N: usize>(rng: &mut R, catalog: &[&'a str; N]) -> &'a str {
    catalog[rng.random_range(0..N)]
}
