use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::DataStore;

pub fn run<S: DataStore>(store: &S, id: &str) -> Result<CmdResult> {
    let article = store.get_article(id)?;
    Ok(CmdResult::default().with_affected_articles(vec![article]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FolioError;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn returns_the_article() {
        let fixture = StoreFixture::new().with_article("42", "Answer", "psychology");
        let result = run(&fixture.store, "42").unwrap();
        assert_eq!(result.first_affected().unwrap().title, "Answer");
    }

    #[test]
    fn unknown_id_is_not_found() {
        let fixture = StoreFixture::new();
        assert!(matches!(
            run(&fixture.store, "nope"),
            Err(FolioError::ArticleNotFound(_))
        ));
    }
}
