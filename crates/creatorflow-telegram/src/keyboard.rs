//! The fixed main-menu reply keyboard.
//!
//! The button labels double as routing keys: the router matches inbound
//! text against them byte-for-byte, so they must never drift from what
//! this keyboard renders.

pub const BTN_NEW_IDEA: &str = "Add Content Idea";
pub const BTN_NEW_TODO: &str = "Add To-Do";
pub const BTN_INFO: &str = "Info Command";
pub const BTN_WEBSITE: &str = "Website Link";

/// The `reply_markup` value attached to menu-level sends. Two fixed rows.
pub fn main_menu_keyboard() -> serde_json::Value {
    serde_json::json!({
        "keyboard": [
            [BTN_NEW_IDEA, BTN_NEW_TODO],
            [BTN_INFO, BTN_WEBSITE],
        ],
        "resize_keyboard": true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_has_the_two_fixed_rows() {
        let kb = main_menu_keyboard();
        assert_eq!(
            kb["keyboard"],
            serde_json::json!([
                ["Add Content Idea", "Add To-Do"],
                ["Info Command", "Website Link"],
            ])
        );
        assert_eq!(kb["resize_keyboard"], serde_json::json!(true));
    }
}
