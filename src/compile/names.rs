//! Field reference naming.

/// Map a field reference to the identifier it is projected and keyed under.
///
/// `Member.Surname` becomes `Member_Surname`; references without a dot are
/// returned unchanged. Applying it twice gives the same result.
pub fn resolve(field_ref: &str) -> String {
    field_ref.replace('.', "_")
}
