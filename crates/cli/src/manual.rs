// patfolio template / links: manual entry when the search API falls short

use std::path::Path;

use crate::export;
use crate::CliError;

const GOOGLE_PATENTS: &str = "https://patents.google.com/";
const USPTO_SEARCH: &str = "https://ppubs.uspto.gov/pubwebapp/static/pages/ppubsbasic.html";
const WIPO_SEARCH: &str = "https://patentscope.wipo.int/search/en/search.jsf";

/// A search page and the query to run there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchLink {
    pub name: &'static str,
    pub url: String,
    pub query: String,
}

/// Search pages for an inventor. Only Google Patents takes the query in the
/// URL; the others get it pasted into their search form.
pub fn search_links(inventor: &str, assignee: Option<&str>) -> Result<Vec<SearchLink>, CliError> {
    let inventor = inventor.trim();
    if inventor.is_empty() {
        return Err(CliError::args("inventor name is empty"));
    }
    let assignee = assignee.map(str::trim).filter(|a| !a.is_empty());

    let mut google = format!("inventor:\"{inventor}\"");
    let mut uspto = inventor.to_string();
    let mut wipo = format!("IN:({inventor})");
    if let Some(a) = assignee {
        google.push_str(&format!(" assignee:\"{a}\""));
        uspto.push_str(&format!(" AND {a}"));
        wipo.push_str(&format!(" AND AN:({a})"));
    }

    let google_url = url::Url::parse_with_params(GOOGLE_PATENTS, &[("q", google.as_str())])
        .map_err(|e| CliError::general(format!("cannot build search URL: {}", e)))?;

    Ok(vec![
        SearchLink { name: "Google Patents", url: google_url.into(), query: google },
        SearchLink { name: "USPTO Public Search", url: USPTO_SEARCH.into(), query: uspto },
        SearchLink { name: "WIPO PatentScope", url: WIPO_SEARCH.into(), query: wipo },
    ])
}

pub fn cmd_links(inventor: &str, assignee: Option<&str>) -> Result<(), CliError> {
    let links = search_links(inventor, assignee)?;

    println!("=== Manual Patent Search for {} ===", inventor.trim());
    if let Some(a) = assignee.map(str::trim).filter(|a| !a.is_empty()) {
        println!("Assignee filter: {a}");
    }
    println!("\nSearch links:");
    for link in &links {
        println!("  {:<20} {}", link.name, link.url);
        println!("  {:<20} query: {}", "", link.query);
    }
    println!(
        "\nFor each relevant patent, collect title, number, issue date, all inventors\n\
         (check your name is listed), assignee, abstract and URL. Record them in a\n\
         CSV entry template:\n\n  patfolio template manual_patents.csv"
    );
    println!(
        "\nTips:\n  \
         - Try name variations (initials, middle names).\n  \
         - Narrow by assignee when the name is common.\n  \
         - Check both granted patents and published applications."
    );
    Ok(())
}

pub fn cmd_template(path: &Path, rows: usize) -> Result<(), CliError> {
    export::write_template(path, rows)?;
    println!("Created patent template: {}", path.display());
    println!("\nColumns:");
    println!("  Title               Full patent title");
    println!("  Patent Number       Number without the US prefix, e.g. 10123456");
    println!("  Issue Date          YYYY-MM-DD");
    println!("  Inventors           Comma-separated names");
    println!("  Assignee            Company name");
    println!("  Abstract            Brief description, under 2000 characters");
    println!("  Google Patents URL  Link to the patent page");
    Ok(())
}
