use serde::Deserialize;

/// Page of a server-side paginated endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub count: usize,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// List endpoints answer either a bare array or a page, depending on the
/// backend pagination settings of the resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListBody<T> {
    Paged(Page<T>),
    Plain(Vec<T>),
}

impl<T> ListBody<T> {
    /// Items of this body and whether the backend has a further page.
    pub fn into_parts(self) -> (Vec<T>, bool) {
        match self {
            ListBody::Paged(page) => (page.results, page.next.is_some()),
            ListBody::Plain(items) => (items, false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_body_accepts_both_shapes() {
        let plain: ListBody<i32> = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(plain.into_parts(), (vec![1, 2], false));

        let paged: ListBody<i32> =
            serde_json::from_str(r#"{"count": 3, "next": "x", "previous": null, "results": [3]}"#)
                .unwrap();
        assert_eq!(paged.into_parts(), (vec![3], true));

        let last: ListBody<i32> =
            serde_json::from_str(r#"{"count": 3, "next": null, "results": [4]}"#).unwrap();
        assert_eq!(last.into_parts(), (vec![4], false));
    }
}
