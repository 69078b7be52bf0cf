use serde::Deserialize;

/// List endpoints answer either with a bare array or with a page envelope
/// (`{count, next, previous, results}`), depending on backend pagination.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Page(Page<T>),
    Plain(Vec<T>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Page(page) => page.results,
            Listing::Plain(items) => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_shapes() {
        let plain: Listing<u32> = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(plain.into_items(), vec![1, 2]);

        let paged: Listing<u32> = serde_json::from_str(
            r#"{"count": 3, "next": "http://x/?page=2", "previous": null, "results": [1, 2]}"#,
        )
        .unwrap();
        assert_eq!(paged.into_items(), vec![1, 2]);
    }
}
