/// Equality that inspects every byte regardless of where the first mismatch is.
///
/// Inputs of different length compare unequal immediately; only the contents are
/// protected, the length is not treated as secret.
pub trait ConstantTimeEq {
    fn ct_eq(&self, other: &Self) -> bool;
}

impl ConstantTimeEq for [u8] {
    fn ct_eq(&self, other: &Self) -> bool {
        subtle::ConstantTimeEq::ct_eq(self, other).into()
    }
}

impl ConstantTimeEq for str {
    fn ct_eq(&self, other: &Self) -> bool {
        self.as_bytes().ct_eq(other.as_bytes())
    }
}
