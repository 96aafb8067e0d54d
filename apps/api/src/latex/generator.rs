//! Renders `LatexResumeData` into a complete LaTeX document.
//!
//! Rendering is pure string substitution into `RESUME_TEMPLATE`: equal input
//! always produces byte-identical output. Every user-supplied string is escaped
//! before it reaches the document.

use std::fmt::Write;

use crate::latex::template::{CONTACT_SLOT, NAME_SLOT, RESUME_TEMPLATE, SECTIONS_SLOT};
use crate::models::latex::{EducationItem, ExperienceItem, LatexResumeData, LeadershipItem};

/// Escapes LaTeX special characters in running text.
pub fn escape_latex(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => out.push_str(r"\textbackslash{}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Escapes the target of `\href{...}`. Only the characters hyperref cannot
/// take verbatim are touched; backslash and braces are percent-encoded.
pub fn escape_url(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '%' => out.push_str(r"\%"),
            '#' => out.push_str(r"\#"),
            '\\' => out.push_str(r"\%5C"),
            '{' => out.push_str(r"\%7B"),
            '}' => out.push_str(r"\%7D"),
            _ => out.push(c),
        }
    }
    out
}

pub fn generate_latex(data: &LatexResumeData) -> String {
    let mut sections = String::new();
    push_education(&mut sections, &data.education);
    push_experience(&mut sections, &data.experience);
    push_leadership(&mut sections, &data.leadership);
    push_simple_list(&mut sections, "Certifications", &data.certifications);
    push_skills(&mut sections, &data.skills);

    RESUME_TEMPLATE
        .replace(SECTIONS_SLOT, &sections)
        .replace(CONTACT_SLOT, &contact_line(data))
        .replace(NAME_SLOT, &escape_latex(data.name.trim()))
}

fn contact_line(data: &LatexResumeData) -> String {
    let mut parts = Vec::new();
    let phone = data.phone.trim();
    if !phone.is_empty() {
        parts.push(escape_latex(phone));
    }
    let email = data.email.trim();
    if !email.is_empty() {
        parts.push(format!(
            r"\href{{mailto:{}}}{{\underline{{{}}}}}",
            escape_url(email),
            escape_latex(email)
        ));
    }
    let linkedin = data.linkedin.trim();
    if !linkedin.is_empty() {
        parts.push(format!(
            r"\href{{{}}}{{\underline{{{}}}}}",
            escape_url(linkedin),
            escape_latex(display_url(linkedin))
        ));
    }
    parts.join(" $|$ ")
}

fn display_url(url: &str) -> &str {
    let url = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    url.strip_prefix("www.").unwrap_or(url)
}

fn date_range(start: &str, end: &str) -> String {
    match (start.trim(), end.trim()) {
        ("", "") => String::new(),
        (s, "") => escape_latex(s),
        ("", e) => escape_latex(e),
        (s, e) => format!("{} -- {}", escape_latex(s), escape_latex(e)),
    }
}

fn non_empty<'a>(items: &'a [String]) -> impl Iterator<Item = &'a str> {
    items.iter().map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn push_section_header(out: &mut String, title: &str) {
    let _ = write!(out, "\n\\section{{{title}}}\n  \\resumeSubHeadingListStart\n");
}

fn push_subheading(out: &mut String, fields: [&str; 4]) {
    let _ = write!(
        out,
        "    \\resumeSubheading\n      {{{}}}{{{}}}\n      {{{}}}{{{}}}\n",
        fields[0], fields[1], fields[2], fields[3]
    );
}

fn push_items(out: &mut String, items: &[String]) {
    let mut items = non_empty(items).peekable();
    if items.peek().is_none() {
        return;
    }
    out.push_str("      \\resumeItemListStart\n");
    for item in items {
        let _ = writeln!(out, "        \\resumeItem{{{}}}", escape_latex(item));
    }
    out.push_str("      \\resumeItemListEnd\n");
}

fn push_section_footer(out: &mut String) {
    out.push_str("  \\resumeSubHeadingListEnd\n");
}

fn push_education(out: &mut String, education: &[EducationItem]) {
    if education.is_empty() {
        return;
    }
    push_section_header(out, "Education");
    for item in education {
        push_subheading(
            out,
            [
                &escape_latex(item.institution.trim()),
                &escape_latex(item.location.trim()),
                &escape_latex(item.degree.trim()),
                &date_range(&item.start_date, &item.end_date),
            ],
        );
        push_items(out, &item.details);
    }
    push_section_footer(out);
}

fn push_experience(out: &mut String, experience: &[ExperienceItem]) {
    if experience.is_empty() {
        return;
    }
    push_section_header(out, "Experience");
    for item in experience {
        push_subheading(
            out,
            [
                &escape_latex(item.position.trim()),
                &date_range(&item.start_date, &item.end_date),
                &escape_latex(item.company.trim()),
                &escape_latex(item.location.trim()),
            ],
        );
        push_items(out, &item.achievements);
    }
    push_section_footer(out);
}

fn push_leadership(out: &mut String, leadership: &[LeadershipItem]) {
    if leadership.is_empty() {
        return;
    }
    push_section_header(out, "Leadership");
    for item in leadership {
        push_subheading(
            out,
            [
                &escape_latex(item.organization.trim()),
                &date_range(&item.start_date, &item.end_date),
                &escape_latex(item.position.trim()),
                "",
            ],
        );
        push_items(out, &item.achievements);
    }
    push_section_footer(out);
}

fn push_simple_list(out: &mut String, title: &str, items: &[String]) {
    let mut items = non_empty(items).peekable();
    if items.peek().is_none() {
        return;
    }
    let _ = write!(out, "\n\\section{{{title}}}\n  \\resumeItemListStart\n");
    for item in items {
        let _ = writeln!(out, "    \\resumeItem{{{}}}", escape_latex(item));
    }
    out.push_str("  \\resumeItemListEnd\n");
}

fn push_skills(out: &mut String, skills: &[String]) {
    let skills: Vec<String> = non_empty(skills).map(escape_latex).collect();
    if skills.is_empty() {
        return;
    }
    let _ = write!(
        out,
        "\n\\section{{Skills}}\n  \\begin{{itemize}}[leftmargin=0.15in, label={{}}]\n    \\small{{\\item{{{}}}}}\n  \\end{{itemize}}\n",
        skills.join(", ")
    );
}
