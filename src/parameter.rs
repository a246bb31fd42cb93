/// Splits a protoc plugin parameter string into ordered `(key, value)` pairs.
///
/// Pairs are separated by `,` and split on the first `=`. Keys and values are
/// trimmed of surrounding whitespace. A piece without `=` becomes a key with
/// an empty value. Empty pieces are kept so the caller can reject them.
pub fn parse_parameter(parameter: Option<&str>) -> Vec<(String, String)> {
    let Some(parameter) = parameter.filter(|p| !p.is_empty()) else {
        return Vec::new();
    };

    parameter
        .split(',')
        .map(|piece| match piece.split_once('=') {
            Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
            None => (piece.trim().to_string(), String::new()),
        })
        .collect()
}
