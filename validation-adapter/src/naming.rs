/// Converts a field name to lower case with underscores.
///
/// Every uppercase letter after the first character starts a new word, so
/// `FirstName` becomes `first_name` and `UserID` becomes `user_i_d`.
/// Names that are already snake case pass through unchanged.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            out.push('_');
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}
