/// Built-in message for a rule tag.
pub fn default_message(tag: &str, param: Option<&str>) -> String {
    let param = param.unwrap_or_default();
    match tag {
        "required" => "is required".to_string(),
        "email" => "must be a valid email".to_string(),
        "url" => "must be a valid URL".to_string(),
        "gte" => format!("must be >= {param}"),
        "lte" => format!("must be <= {param}"),
        "min" => format!("must be at least {param} characters"),
        "max" => format!("must be at most {param} characters"),
        "len" => format!("must be exactly {param} characters"),
        other => format!("failed validation: {other}"),
    }
}
