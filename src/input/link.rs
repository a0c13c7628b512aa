//! Code for reading the optional links CSV file
use super::{input_err_msg, read_csv_optional};
use crate::addback::{Link, LinkMap};
use crate::id::collect_unique;
use anyhow::{Context, Result, ensure};
use std::path::Path;

const LINKS_FILE_NAME: &str = "links.csv";

/// Read links from the specified scenario directory.
///
/// Links are only needed for the transmission add-back, so an absent file gives an empty map.
pub fn read_links(scenario_dir: &Path) -> Result<LinkMap> {
    let file_path = scenario_dir.join(LINKS_FILE_NAME);
    let links = read_csv_optional::<Link>(&file_path)?;
    read_links_from_iter(links).with_context(|| input_err_msg(&file_path))
}

fn read_links_from_iter<I>(iter: I) -> Result<LinkMap>
where
    I: IntoIterator<Item = Link>,
{
    let links = collect_unique(iter)?;
    for link in links.values() {
        ensure!(
            link.length.is_finite() && link.capacity.is_finite(),
            "Length and capacity of link {} must be finite",
            link.id
        );
    }

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, links};
    use crate::units::Length;
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[rstest]
    fn test_read_links_from_iter(links: LinkMap) {
        let expected = links.clone();
        assert_eq!(read_links_from_iter(links.into_values()).unwrap(), expected);
    }

    #[rstest]
    fn test_read_links_from_iter_not_finite(mut links: LinkMap) {
        links["DK DE"].length = Length(f64::INFINITY);
        assert_error!(
            read_links_from_iter(links.into_values()),
            "Length and capacity of link DK DE must be finite"
        );
    }

    #[test]
    fn test_read_links() {
        let dir = tempdir().unwrap();
        assert!(read_links(dir.path()).unwrap().is_empty());

        {
            let mut file = File::create(dir.path().join(LINKS_FILE_NAME)).unwrap();
            writeln!(file, "id,length,capacity\nDK DE,600,1000\nDE SE,800,500").unwrap();
        }
        let links = read_links(dir.path()).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links["DE SE"].length, Length(800.0));
    }
}
