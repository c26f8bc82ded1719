//! Default jurisdiction table.
//!
//! EU patterns accept the number with or without its two-letter prefix
//! (Greece uses `EL`). The Swiss pattern requires the `CHE` prefix, the
//! separators are optional and the MWST/TVA/IVA suffix may follow.

use crate::core::BackendId;

/// `(country code, full-match pattern, backend id)`.
pub(super) const BUILTIN_RULES: &[(&str, &str, &str)] = &[
    ("AT", r"^(?:AT)?U[0-9]{8}$", BackendId::EU_VIES),
    ("BE", r"^(?:BE)?[0-9]{10}$", BackendId::EU_VIES),
    ("BG", r"^(?:BG)?[0-9]{9,10}$", BackendId::EU_VIES),
    ("CH", r"^CHE-?[0-9]{3}\.?[0-9]{3}\.?[0-9]{3}(?: ?(?:MWST|TVA|IVA))?$", BackendId::CH_UID),
    ("CY", r"^(?:CY)?[0-9]{8}[A-Z]$", BackendId::EU_VIES),
    ("CZ", r"^(?:CZ)?[0-9]{8,10}$", BackendId::EU_VIES),
    ("DE", r"^(?:DE)?[0-9]{9}$", BackendId::EU_VIES),
    ("DK", r"^(?:DK)?[0-9]{8}$", BackendId::EU_VIES),
    ("EE", r"^(?:EE)?[0-9]{9}$", BackendId::EU_VIES),
    ("ES", r"^(?:ES)?[0-9A-Z]{9}$", BackendId::EU_VIES),
    ("FI", r"^(?:FI)?[0-9]{8}$", BackendId::EU_VIES),
    ("FR", r"^(?:FR)?[0-9A-Z]{2}[0-9]{9}$", BackendId::EU_VIES),
    ("GR", r"^(?:EL)?[0-9]{9}$", BackendId::EU_VIES),
    ("HR", r"^(?:HR)?[0-9]{11}$", BackendId::EU_VIES),
    ("HU", r"^(?:HU)?[0-9]{8}$", BackendId::EU_VIES),
    ("IE", r"^(?:IE)?[0-9A-Z]{8,9}$", BackendId::EU_VIES),
    ("IT", r"^(?:IT)?[0-9]{11}$", BackendId::EU_VIES),
    ("LT", r"^(?:LT)?(?:[0-9]{9}|[0-9]{12})$", BackendId::EU_VIES),
    ("LU", r"^(?:LU)?[0-9]{8}$", BackendId::EU_VIES),
    ("LV", r"^(?:LV)?[0-9]{11}$", BackendId::EU_VIES),
    ("MT", r"^(?:MT)?[0-9]{8}$", BackendId::EU_VIES),
    ("NL", r"^(?:NL)?[0-9]{9}B[0-9]{2}$", BackendId::EU_VIES),
    ("PL", r"^(?:PL)?[0-9]{10}$", BackendId::EU_VIES),
    ("PT", r"^(?:PT)?[0-9]{9}$", BackendId::EU_VIES),
    ("RO", r"^(?:RO)?[0-9]{2,10}$", BackendId::EU_VIES),
    ("SE", r"^(?:SE)?[0-9]{12}$", BackendId::EU_VIES),
    ("SI", r"^(?:SI)?[0-9]{8}$", BackendId::EU_VIES),
    ("SK", r"^(?:SK)?[0-9]{10}$", BackendId::EU_VIES),
    ("XI", r"^(?:XI)?(?:[0-9]{9}|[0-9]{12}|GD[0-9]{3}|HA[0-9]{3})$", BackendId::EU_VIES),
];
