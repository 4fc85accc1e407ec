/// Maximum length for client names.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length for company identifiers.
pub const MAX_COMPANY_IDENTIFIER_LEN: usize = 255;

/// Phone numbers are 7 to 20 characters long.
pub const PHONE_MIN_LEN: usize = 7;
pub const PHONE_MAX_LEN: usize = 20;

/// Costs are stored as `NUMERIC(19,2)`: at most 17 integer digits and 2 decimal places.
pub const MAX_COST_INTEGER_DIGITS: u32 = 17;
pub const MAX_COST_SCALE: u32 = 2;

/// Characters allowed in a phone number besides ASCII digits.
pub const PHONE_EXTRA_CHARS: &[char] = &['+', '(', ')', '.', ' ', '-'];
