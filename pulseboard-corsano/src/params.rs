//! Query-string encoding in the API's PHP-array convention.

/// One query parameter value: a scalar, or a list that expands into
/// positional `key[i]=value` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// A single `key=value` pair.
    Single(String),
    /// A positional list: `key[0]=a&key[1]=b`.
    List(Vec<String>),
}

impl ParamValue {
    /// Build a scalar value from anything displayable.
    pub fn single(value: impl ToString) -> Self {
        ParamValue::Single(value.to_string())
    }

    /// Build a positional list value.
    pub fn list(values: impl IntoIterator<Item = impl ToString>) -> Self {
        ParamValue::List(values.into_iter().map(|v| v.to_string()).collect())
    }
}

/// Encode parameters into a query string, `?` included. Empty input
/// encodes to the empty string.
pub fn encode_query(params: &[(&str, ParamValue)]) -> String {
    if params.is_empty() {
        return String::new();
    }

    let mut parts = Vec::new();
    for (key, value) in params {
        match value {
            ParamValue::Single(value) => parts.push(format!("{key}={value}")),
            ParamValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    parts.push(format!("{key}[{i}]={item}"));
                }
            }
        }
    }
    format!("?{}", parts.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_params() {
        assert_eq!(encode_query(&[]), "");
    }

    #[test]
    fn test_scalar_params() {
        let query = encode_query(&[
            ("date_from", ParamValue::single("2023-04-01")),
            ("page", ParamValue::single(2)),
        ]);
        assert_eq!(query, "?date_from=2023-04-01&page=2");
    }

    #[test]
    fn test_list_params_expand_positionally() {
        let query = encode_query(&[
            ("types", ParamValue::list(["activity", "heart_rate"])),
            ("page", ParamValue::single(1)),
        ]);
        assert_eq!(query, "?types[0]=activity&types[1]=heart_rate&page=1");
    }
}
