use crate::models::leaderboard::LeaderboardView;
use std::fmt::Write;

const STYLE: &str = "body{font-family:Roboto,Arial,sans-serif;margin:0;color:#202124}\
header{border-bottom:1px solid #dadce0;padding:24px 48px}\
main{max-width:1100px;margin:0 auto;padding:32px 24px}\
table{width:100%;border-collapse:collapse}\
th,td{padding:12px 16px;border-bottom:1px solid #eee;text-align:left}\
th{background:#f8f9fa;font-weight:500}\
.rank{font-weight:700;color:#1a73e8}.total{font-weight:700}\
.notice{padding:48px;text-align:center;color:#5f6368}\
form{display:flex;flex-direction:column;gap:16px;max-width:420px}\
.success{padding:12px 16px;background:#e6f4ea;color:#137333}\
.error{padding:12px 16px;background:#fce8e6;color:#c5221f}\
#rules{margin-top:48px}";

const RULES: &str = "<section id=\"rules\"><h2>Competition Rules</h2>\
<h3>Objective</h3>\
<p>Complete as many Google Cloud skill badges and arcade games as possible to climb the leaderboard.</p>\
<h3>Scoring System</h3><ul>\
<li>Each completed <strong>Skill Badge</strong> = 1 point</li>\
<li>Each completed <strong>Arcade Game</strong> = 1 point</li>\
<li><strong>Total Score</strong> = Skill Badges + Arcade Games</li></ul>\
<h3>Rewards and Surprises</h3><p>To be revealed soon!</p></section>";

/// Result of an upload, shown above the admin form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadNotice<'a> {
    Success { rows: usize },
    Error(&'a str),
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{title}</title><style>{STYLE}</style></head>\
         <body><header><h1>Google Cloud Skills Boost</h1><h2>{title}</h2></header>\
         <main>{body}</main></body></html>\n",
        title = escape(title),
    )
}

/// Only http(s) links are rendered as anchors.
fn safe_href(url: &str) -> Option<&str> {
    let lower = url.to_ascii_lowercase();
    (lower.starts_with("https://") || lower.starts_with("http://")).then_some(url)
}

pub fn leaderboard_page(view: Option<&LeaderboardView>) -> String {
    let mut body = String::from(
        "<p><a href=\"/admin\">Admin</a> | <a href=\"#rules\">Rules</a></p>",
    );

    let Some(view) = view else {
        body.push_str("<div class=\"notice\">No leaderboard has been uploaded yet.</div>");
        body.push_str(RULES);
        return layout("Leaderboard", &body);
    };

    let _ = write!(
        body,
        "<p>Total Participants: <strong>{}</strong> (Top {} shown)</p>",
        view.total_participants, view.shown
    );
    body.push_str(
        "<table><thead><tr><th>Rank</th><th>Participant</th><th>Email</th>\
         <th>Skill Badges</th><th>Arcade Games</th><th>Total Score</th></tr></thead><tbody>",
    );

    for entry in &view.entries {
        let name = if entry.name.is_empty() { "N/A" } else { entry.name.as_str() };
        let participant = match entry.profile_url.as_deref().and_then(safe_href) {
            Some(url) => format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                escape(url),
                escape(name)
            ),
            None => escape(name),
        };
        let email = if entry.email.is_empty() { "N/A" } else { entry.email.as_str() };
        let _ = write!(
            body,
            "<tr><td class=\"rank\">#{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td class=\"total\">{}</td></tr>",
            entry.rank,
            participant,
            escape(email),
            entry.skill_badges,
            entry.arcade_games,
            entry.total_score
        );
    }
    body.push_str("</tbody></table>");
    body.push_str(RULES);

    layout("Leaderboard", &body)
}

pub fn admin_page(notice: Option<UploadNotice<'_>>) -> String {
    let mut body = String::from("<p><a href=\"/\">Back to leaderboard</a></p>");
    match notice {
        Some(UploadNotice::Success { rows }) => {
            let _ = write!(
                body,
                "<div class=\"success\">Upload successful! {rows} participants updated.</div>"
            );
        }
        Some(UploadNotice::Error(message)) => {
            let _ = write!(body, "<div class=\"error\">{}</div>", escape(message));
        }
        None => {}
    }
    body.push_str(
        "<form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\
        <label>Admin password <input type=\"password\" name=\"password\" required></label>\
        <label>Leaderboard CSV <input type=\"file\" name=\"file\" accept=\".csv\" required></label>\
        <button type=\"submit\">Upload</button></form>",
    );
    layout("Admin", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::leaderboard::Columns;
    use crate::services::{csv, ranking};

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"Tom\" & 'Jerry'</b>"), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_empty_board() {
        let html = leaderboard_page(None);
        assert!(html.contains("No leaderboard has been uploaded yet."));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_board_rows() {
        let text = "User Name,Google Cloud Skills Boost Profile URL,# of Skill Badges Completed,# of Arcade Games Completed\n\
                    <script>,javascript:alert(1),1,1\n\
                    Ann,https://example.com/ann,4,2\n\
                    ,,0,0\n";
        let view = ranking::leaderboard_view(csv::parse(text), &Columns::default(), 100);
        let html = leaderboard_page(Some(&view));

        assert!(html.contains("Total Participants: <strong>3</strong> (Top 3 shown)"));
        assert!(html.contains("<a href=\"https://example.com/ann\" target=\"_blank\" rel=\"noopener noreferrer\">Ann</a>"));
        assert!(html.contains("<td>&lt;script&gt;</td>"));
        assert!(!html.contains("javascript:"));
        assert!(html.contains("<td>N/A</td>"));
        assert!(html.find("Ann").unwrap() < html.find("&lt;script&gt;").unwrap());
    }

    #[test]
    fn test_board_email_column() {
        let text = "User Name,User Email,# of Skill Badges Completed\n\
                    Ann,ann@example.com,4\n\
                    Bob,,1\n";
        let view = ranking::leaderboard_view(csv::parse(text), &Columns::default(), 100);
        let html = leaderboard_page(Some(&view));

        assert!(html.contains("<th>Email</th>"));
        assert!(html.contains("<td>Ann</td><td>ann@example.com</td>"));
        assert!(html.contains("<td>Bob</td><td>N/A</td>"));
    }

    #[test]
    fn test_rules_section() {
        for html in [leaderboard_page(None), {
            let view = ranking::leaderboard_view(csv::parse("User Name\nAnn\n"), &Columns::default(), 100);
            leaderboard_page(Some(&view))
        }] {
            assert!(html.contains("href=\"#rules\""));
            assert!(html.contains("<h2>Competition Rules</h2>"));
            assert!(html.contains("<h3>Objective</h3>"));
            assert!(html.contains("<h3>Scoring System</h3>"));
            assert!(html.contains("<strong>Total Score</strong> = Skill Badges + Arcade Games"));
        }
    }

    #[test]
    fn test_admin_form_fields() {
        let html = admin_page(None);
        assert!(html.contains("action=\"/upload\""));
        assert!(html.contains("name=\"password\""));
        assert!(html.contains("name=\"file\""));
        assert!(!html.contains("class=\"success\""));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn test_admin_upload_notices() {
        let html = admin_page(Some(UploadNotice::Success { rows: 42 }));
        assert!(html.contains("Upload successful! 42 participants updated."));

        let html = admin_page(Some(UploadNotice::Error("Only <CSV> files")));
        assert!(html.contains("<div class=\"error\">Only &lt;CSV&gt; files</div>"));
    }
}
