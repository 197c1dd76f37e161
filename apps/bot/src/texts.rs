//! User-facing message templates (Telegram Markdown).

use sitebot_core::{PublishedSite, ValidationError};

pub const WELCOME: &str = "🎉 *Welcome to Sitebot!*\n\n\
Send me an HTML file and I will put it online for you, free and in seconds.\n\n\
📋 *What I can do:*\n\
• 🌐 Deploy an HTML page to static hosting\n\
• 📱 Give you a ready-to-share URL\n\
• 📋 Keep a list of your deployed sites\n\n\
Pick an option below to get started:";

pub const ASK_NAME: &str = "🌐 *Let's create a new website!*\n\n\
Step 1: send me a name for your site\n\
(for example: my-portfolio, company-landing)\n\n\
⚠️ Names may only use letters, digits and hyphens (-), 3 to 50 characters.";

pub const PROCESSING: &str = "⏳ Processing your HTML file...";
pub const DEPLOYING: &str = "🚀 Deploying your website...";

pub const CANCELLED: &str = "❌ Cancelled. Pick another option from the menu.";

pub const CHOOSE_NEXT: &str = "Pick an option for your next action:";

pub const MY_SITES_EMPTY: &str = "📋 *My Websites*\n\n\
You have no deployed websites yet.\n\
Tap \"🌐 Create Website\" to publish your first one!";

pub const HELP: &str = "❓ *How to use this bot*\n\n\
1. Tap \"🌐 Create Website\"\n\
2. Send a name for your site\n\
3. Upload your HTML file\n\
4. Get your public URL\n\n\
📝 *File requirements:*\n\
• Format: .html\n\
• Maximum size: 10 MiB\n\n\
💡 The site name has to be unique on the hosting platform, so pick \
something distinctive.";

pub const FETCH_FAILED: &str = "❌ *Something went wrong while reading your file!*\n\n\
Please try uploading it again in a moment.";

pub fn ask_file(name: &str) -> String {
    format!(
        "✅ Site name: *{name}*\n\n\
         Step 2: upload your HTML file\n\
         📎 Tap the attachment icon and pick the file\n\n\
         ⚠️ *Requirements:* .html format, at most 10 MiB"
    )
}

pub fn validation(err: &ValidationError) -> String {
    match err {
        ValidationError::NameFormat => "❌ *Invalid name!*\n\n\
             Site names may only use:\n\
             • letters (a-z, A-Z)\n\
             • digits (0-9)\n\
             • hyphens (-)\n\n\
             Send another name:"
            .into(),
        ValidationError::NameLength => "❌ *Invalid name length!*\n\n\
             Site names must be:\n\
             • at least 3 characters\n\
             • at most 50 characters\n\n\
             Send another name:"
            .into(),
        ValidationError::FileExtension => {
            "❌ The file must be in .html format! Please upload a valid HTML file.".into()
        }
        ValidationError::FileTooLarge => "❌ The file is too large! The limit is 10 MiB.".into(),
    }
}

pub fn success(name: &str, url: &str) -> String {
    format!(
        "🎉 *Your website is live!*\n\n\
         📝 *Details:*\n\
         • Name: {name}\n\
         • URL: {url}\n\
         • Status: ✅ Online\n\n\
         💡 Anyone on the internet can open it now!"
    )
}

pub fn name_conflict(name: &str) -> String {
    format!(
        "❌ *The name \"{name}\" is already taken!*\n\n\
         Tap \"🌐 Create Website\" and try again with a different name."
    )
}

pub fn deploy_failed(reason: &str) -> String {
    format!(
        "❌ *Deployment failed!*\n\n\
         Error: {reason}\n\n\
         Please try again, or come back later if the problem persists."
    )
}

pub fn my_sites(sites: &[PublishedSite]) -> String {
    let mut message = String::from("📋 *My Websites*\n\n");
    for (index, site) in sites.iter().enumerate() {
        message.push_str(&format!(
            "{}. *{}*\n   🔗 {}\n   📅 {}\n\n",
            index + 1,
            site.name,
            site.url,
            site.published_at
        ));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_list_renders_every_entry() {
        let sites = vec![
            PublishedSite::new("one", "https://one.example", "dpl_1"),
            PublishedSite::new("two", "https://two.example", "dpl_2"),
        ];
        let rendered = my_sites(&sites);
        assert!(rendered.contains("1. *one*"));
        assert!(rendered.contains("https://two.example"));
    }

    #[test]
    fn validation_messages_are_specific() {
        assert!(validation(&ValidationError::NameLength).contains("length"));
        assert!(validation(&ValidationError::NameFormat).contains("hyphens"));
        assert!(validation(&ValidationError::FileTooLarge).contains("10 MiB"));
    }
}
