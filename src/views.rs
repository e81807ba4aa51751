//! Server-rendered pages. Rendering is intentionally thin: handlers pass
//! query results in, these functions format them into small HTML documents.

use axum::response::Html;

use crate::db::models::{
    DonationSummary, Ngo, NgoSummary, RequirementWithOrg, Role, StoryWithOrg,
};

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn layout(title: &str, flash: Option<&str>, body: &str) -> Html<String> {
    let notice = match flash {
        Some(message) => format!("<p class=\"flash\">{}</p>", escape(message)),
        None => String::new(),
    };
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} - DonateSecure</title>\n</head>\n<body>\n\
         <nav><a href=\"/\">Home</a> <a href=\"/stories\">Stories</a> \
         <a href=\"/urgent_requirements\">Urgent Needs</a> \
         <a href=\"/about\">About</a> <a href=\"/contact\">Contact</a> \
         <a href=\"/login\">Login</a> <a href=\"/choose_role\">Register</a> \
         <a href=\"/logout\">Logout</a></nav>\n{notice}\n{body}\n</body>\n</html>\n",
        title = escape(title),
        notice = notice,
        body = body,
    ))
}

fn story_item(story: &StoryWithOrg) -> String {
    format!(
        "<article><h3>{}</h3><p>{}</p><footer>{} &middot; {}</footer></article>",
        escape(&story.title),
        escape(&story.content),
        escape(&story.org_name),
        story.created_at.format("%Y-%m-%d"),
    )
}

fn requirement_item(req: &RequirementWithOrg) -> String {
    let deadline = req
        .deadline
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "open-ended".to_string());
    format!(
        "<article><h3>{}</h3><p>{}</p>\
         <p>Needed: ₹{:.2} &middot; Raised: ₹{:.2} &middot; Deadline: {}</p>\
         <footer>{} &middot; <a href=\"/donate/{}\">Donate</a></footer></article>",
        escape(&req.title),
        escape(&req.description),
        req.amount_needed,
        req.amount_raised,
        deadline,
        escape(&req.org_name),
        req.ngo_id,
    )
}

pub fn index(
    flash: Option<&str>,
    stories: &[StoryWithOrg],
    requirements: &[RequirementWithOrg],
) -> Html<String> {
    let mut body = String::from("<h1>DonateSecure</h1><h2>Featured Stories</h2>");
    for story in stories {
        body.push_str(&story_item(story));
    }
    body.push_str("<h2>Urgent Requirements</h2>");
    for req in requirements {
        body.push_str(&requirement_item(req));
    }
    layout("Home", flash, &body)
}

pub fn about(flash: Option<&str>) -> Html<String> {
    layout(
        "About",
        flash,
        "<h1>About DonateSecure</h1>\
         <p>DonateSecure connects donors with verified NGOs so every rupee \
         reaches an organisation that has passed a registry check.</p>",
    )
}

pub fn contact(flash: Option<&str>) -> Html<String> {
    layout(
        "Contact",
        flash,
        "<h1>Contact</h1><p>Write to support@donatesecure.example.</p>",
    )
}

pub fn choose_role(flash: Option<&str>) -> Html<String> {
    layout(
        "Choose Role",
        flash,
        "<h1>Join DonateSecure</h1>\
         <p><a href=\"/register/donor\">I want to donate</a></p>\
         <p><a href=\"/register/receiver\">I represent an NGO</a></p>",
    )
}

pub fn register(flash: Option<&str>, role: Role) -> Html<String> {
    let body = format!(
        "<h1>Register as {role}</h1>\
         <form method=\"post\" action=\"/process_register\">\
         <input type=\"hidden\" name=\"role\" value=\"{role}\">\
         <label>Email <input type=\"email\" name=\"email\" required></label>\
         <label>Password <input type=\"password\" name=\"password\" required></label>\
         <button type=\"submit\">Register</button></form>",
        role = role.as_str(),
    );
    layout("Register", flash, &body)
}

pub fn login(flash: Option<&str>) -> Html<String> {
    layout(
        "Login",
        flash,
        "<h1>Login</h1><form method=\"post\" action=\"/process_login\">\
         <label>Email <input type=\"email\" name=\"email\" required></label>\
         <label>Password <input type=\"password\" name=\"password\" required></label>\
         <button type=\"submit\">Login</button></form>",
    )
}

pub fn ngo_registration(flash: Option<&str>) -> Html<String> {
    layout(
        "NGO Registration",
        flash,
        "<h1>Register your NGO</h1>\
         <form method=\"post\" action=\"/process_ngo_registration\">\
         <label>Organisation name <input name=\"org_name\" required></label>\
         <label>Location <input name=\"location\" required></label>\
         <label>Contact number <input name=\"contact_number\" required></label>\
         <label>Email <input type=\"email\" name=\"email\" required></label>\
         <label>Website <input name=\"website\"></label>\
         <label>Bank name <input name=\"bank_name\" required></label>\
         <label>Account number <input name=\"account_number\" required></label>\
         <label>UPI id <input name=\"upi_id\"></label>\
         <label>Registry id <input name=\"registry_id\" required></label>\
         <button type=\"submit\">Register NGO</button></form>",
    )
}

pub fn donor_dashboard(flash: Option<&str>, ngos: &[NgoSummary]) -> Html<String> {
    let mut body = String::from("<h1>Donor Dashboard</h1><h2>Verified NGOs</h2><ul>");
    for ngo in ngos {
        let website = ngo
            .website
            .as_deref()
            .map(|w| format!(" &middot; <a href=\"{}\">{}</a>", escape(w), escape(w)))
            .unwrap_or_default();
        body.push_str(&format!(
            "<li><a href=\"/ngo_details/{}\">{}</a> ({}){} &middot; {} donations \
             &middot; <a href=\"/donate/{}\">Donate</a></li>",
            ngo.id,
            escape(&ngo.org_name),
            escape(&ngo.location),
            website,
            ngo.donation_count,
            ngo.id,
        ));
    }
    body.push_str("</ul>");
    layout("Donor Dashboard", flash, &body)
}

pub fn ngo_dashboard(
    flash: Option<&str>,
    ngo: &Ngo,
    donations: &[DonationSummary],
    stories_count: i64,
    urgent_count: i64,
) -> Html<String> {
    let verified = if ngo.is_verified {
        "verified"
    } else {
        "verification pending"
    };
    let mut body = format!(
        "<h1>{}</h1><p>{} &middot; {}</p>\
         <p>{} stories &middot; {} active urgent requirements</p>\
         <p><a href=\"/add_story\">Add story</a> \
         <a href=\"/add_urgent_requirement\">Post urgent requirement</a></p>\
         <h2>Donations received</h2><table>\
         <tr><th>Donor</th><th>Amount</th><th>Status</th><th>Date</th></tr>",
        escape(&ngo.org_name),
        escape(&ngo.location),
        verified,
        stories_count,
        urgent_count,
    );
    for donation in donations {
        body.push_str(&format!(
            "<tr><td>{}</td><td>₹{:.2}</td><td>{}</td><td>{}</td></tr>",
            escape(&donation.donor_email),
            donation.amount,
            escape(&donation.status),
            donation.created_at.format("%Y-%m-%d"),
        ));
    }
    body.push_str("</table>");
    layout("NGO Dashboard", flash, &body)
}

pub fn ngo_details(flash: Option<&str>, ngo: &Ngo, stories: &[StoryWithOrg]) -> Html<String> {
    let website = ngo
        .website
        .as_deref()
        .map(|w| format!("<p><a href=\"{}\">{}</a></p>", escape(w), escape(w)))
        .unwrap_or_default();
    let mut body = format!(
        "<h1>{}</h1><p>{} &middot; {}</p>{}\
         <p><a href=\"/donate/{}\">Donate to this NGO</a></p><h2>Stories</h2>",
        escape(&ngo.org_name),
        escape(&ngo.location),
        escape(&ngo.contact_number),
        website,
        ngo.id,
    );
    for story in stories {
        body.push_str(&story_item(story));
    }
    layout(&ngo.org_name, flash, &body)
}

pub fn donate(flash: Option<&str>, ngo: &Ngo) -> Html<String> {
    let body = format!(
        "<h1>Donate to {org}</h1>\
         <p>Bank: {bank} &middot; Account: {account}</p>\
         <form method=\"post\" action=\"/process_donation\">\
         <input type=\"hidden\" name=\"ngo_id\" value=\"{id}\">\
         <label>Amount <input type=\"number\" name=\"amount\" min=\"1\" step=\"0.01\" required></label>\
         <label>Payment method <select name=\"payment_method\">\
         <option value=\"upi\">UPI</option>\
         <option value=\"card\">Card</option>\
         <option value=\"netbanking\">Net banking</option>\
         </select></label>\
         <button type=\"submit\">Donate</button></form>",
        org = escape(&ngo.org_name),
        bank = escape(&ngo.bank_name),
        account = escape(&ngo.account_number),
        id = ngo.id,
    );
    layout("Donate", flash, &body)
}

pub fn add_story(flash: Option<&str>) -> Html<String> {
    layout(
        "Add Story",
        flash,
        "<h1>Share an impact story</h1>\
         <form method=\"post\" action=\"/process_story\">\
         <label>Title <input name=\"title\" required></label>\
         <label>Content <textarea name=\"content\" required></textarea></label>\
         <button type=\"submit\">Submit</button></form>",
    )
}

pub fn add_urgent_requirement(flash: Option<&str>) -> Html<String> {
    layout(
        "Add Urgent Requirement",
        flash,
        "<h1>Post an urgent requirement</h1>\
         <form method=\"post\" action=\"/process_urgent_requirement\">\
         <label>Title <input name=\"title\" required></label>\
         <label>Description <textarea name=\"description\" required></textarea></label>\
         <label>Amount needed <input type=\"number\" name=\"amount_needed\" min=\"1\" step=\"0.01\" required></label>\
         <label>Deadline <input type=\"date\" name=\"deadline\"></label>\
         <button type=\"submit\">Post</button></form>",
    )
}

pub fn stories(flash: Option<&str>, stories: &[StoryWithOrg]) -> Html<String> {
    let mut body = String::from("<h1>Impact Stories</h1>");
    for story in stories {
        body.push_str(&story_item(story));
    }
    layout("Stories", flash, &body)
}

pub fn urgent_requirements(
    flash: Option<&str>,
    requirements: &[RequirementWithOrg],
) -> Html<String> {
    let mut body = String::from("<h1>Urgent Requirements</h1>");
    for req in requirements {
        body.push_str(&requirement_item(req));
    }
    layout("Urgent Requirements", flash, &body)
}

pub fn not_found() -> Html<String> {
    layout("Not Found", None, "<h1>404</h1><p>Page not found.</p>")
}
