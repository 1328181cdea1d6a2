//! Column name derivation

use convert_case::{Boundary, Case, Converter};

/// snake_case a source field identifier
///
/// Word boundaries are lower→upper transitions, acronym ends and existing
/// underscores; digits stay attached (`address2` stays `address2`).
///
/// ```
/// use rowmap_core::registry::naming::to_snake_case;
///
/// assert_eq!(to_snake_case("UserID"), "user_id");
/// assert_eq!(to_snake_case("HTTPStatus"), "http_status");
/// assert_eq!(to_snake_case("created_at"), "created_at");
/// ```
pub fn to_snake_case(name: &str) -> String {
    Converter::new()
        .set_boundaries(&[Boundary::Underscore, Boundary::LowerUpper, Boundary::Acronym])
        .to_case(Case::Snake)
        .convert(name)
}
