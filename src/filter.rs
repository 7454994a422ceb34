//! Product filter carried in the `product` query parameter

use url::form_urlencoded;

/// Name of the query parameter selecting a product
pub const PRODUCT_PARAM: &str = "product";

/// A path plus its query parameters, in their original order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    path: String,
    params: Vec<(String, String)>,
}

impl ProductFilter {
    /// Parse from a request path and raw (still encoded) query string
    pub fn from_request(path: &str, query: Option<&str>) -> Self {
        let params = query
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self {
            path: path.to_string(),
            params,
        }
    }

    /// Selected product; an empty value means no filter
    pub fn current_product(&self) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == PRODUCT_PARAM)
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
    }

    /// Same filter with `product` set, or removed for `None`. Other
    /// parameters are kept as they are. Following the returned `href`
    /// re-renders the timeline for the new selection.
    pub fn with_product(&self, product: Option<&str>) -> Self {
        let mut params: Vec<(String, String)> = Vec::with_capacity(self.params.len() + 1);
        let mut replaced = false;

        for (key, value) in &self.params {
            if key != PRODUCT_PARAM {
                params.push((key.clone(), value.clone()));
                continue;
            }
            // Only the first occurrence survives, carrying the new value
            if let (Some(product), false) = (product, replaced) {
                params.push((key.clone(), product.to_string()));
                replaced = true;
            }
        }

        if let (Some(product), false) = (product, replaced) {
            params.push((PRODUCT_PARAM.to_string(), product.to_string()));
        }

        Self {
            path: self.path.clone(),
            params,
        }
    }

    pub fn query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }

    /// `path` or `path?query`
    pub fn href(&self) -> String {
        let query = self.query();
        if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, query)
        }
    }
}
