use crate::bibtex;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::Library;

pub fn run<S: Library>(store: &S, key: &str) -> Result<CmdResult> {
    let entry = store.get_entry(key)?;
    let text = format!("{}\n", bibtex::render(&entry));
    Ok(CmdResult::default()
        .with_rendered(text)
        .with_affected_entries(vec![entry]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScholarError;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn test_show_renders_entry() {
        let fx = StoreFixture::new().with_article("smith2020quantum", "Smith, John", "2020", "Quantum Foo");
        let result = run(&fx.store, "smith2020quantum").unwrap();
        assert_eq!(
            result.rendered.as_deref(),
            Some(
                "@article{smith2020quantum,\n  author = {Smith, John},\n  date = {2020},\n  title = {Quantum Foo},\n  journaltitle = {Journal of Tests}\n}\n"
            )
        );
    }

    #[test]
    fn test_show_missing() {
        let fx = StoreFixture::new();
        assert!(matches!(
            run(&fx.store, "nope"),
            Err(ScholarError::EntryNotFound(_))
        ));
    }
}
