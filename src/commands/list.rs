//! List wiki entries

use anyhow::Result;

use crate::{SearchOutcome, Wiki};

/// Print all entry titles, or the results of a title search
pub fn run(wiki: &Wiki, search: Option<&str>) -> Result<()> {
    let titles = match search {
        None => wiki.list_entries()?,
        Some(term) => match wiki.search(term)? {
            SearchOutcome::Exact(title) => vec![title],
            SearchOutcome::Matches(titles) => titles,
        },
    };

    match search {
        Some(term) => println!("Entries matching {:?} ({}):", term, titles.len()),
        None => println!("Entries ({}):", titles.len()),
    }
    for title in titles {
        println!("  {}", title);
    }

    Ok(())
}
