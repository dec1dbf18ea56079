//! Customer profile records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Email, ShippingAddress};

/// A customer's stored profile.
///
/// All fields are optional; the profile accumulates whatever the customer
/// has chosen to save. `updated_at` is stamped by the profile store on each
/// write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CustomerProfile {
    /// Preferred display name.
    pub display_name: Option<String>,
    /// Contact email.
    pub email: Option<Email>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Default shipping address for checkout prefill.
    pub default_address: Option<ShippingAddress>,
    /// Server-assigned time of the last save; `None` until first saved.
    pub updated_at: Option<DateTime<Utc>>,
}

impl CustomerProfile {
    /// Merge an update into this profile.
    ///
    /// Fields present in the update replace the stored value; absent fields
    /// are left untouched.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(display_name) = update.display_name {
            self.display_name = Some(display_name);
        }
        if let Some(email) = update.email {
            self.email = Some(email);
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(default_address) = update.default_address {
            self.default_address = Some(default_address);
        }
    }
}

/// A partial profile update with named optional fields.
///
/// Replaces the original free-form field bag: only these fields can be
/// saved, and each is individually optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProfileUpdate {
    /// New display name, if changing.
    pub display_name: Option<String>,
    /// New contact email, if changing.
    pub email: Option<Email>,
    /// New phone number, if changing.
    pub phone: Option<String>,
    /// New default shipping address, if changing.
    pub default_address: Option<ShippingAddress>,
}
