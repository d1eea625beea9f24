//! Element identifiers

use slotmap::new_key_type;

new_key_type! {
    /// Identity of an element within its stage
    pub struct ElementId;
}
