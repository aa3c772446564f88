//! Small DOM helpers for the browser front-end

use web_sys::Document;

/// Show or hide element `id` by toggling its `hidden` class.
/// Other classes on the element are left alone.
pub fn set_visible(document: &Document, id: &str, visible: bool) {
    if let Some(el) = document.get_element_by_id(id) {
        if let Err(e) = el.class_list().toggle_with_force("hidden", !visible) {
            log::warn!("Could not toggle #{}: {:?}", id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_toggle_keeps_other_classes() {
        let document = web_sys::window().unwrap().document().unwrap();
        let el = document.create_element("div").unwrap();
        el.set_id("hud-fps-test");
        el.set_class_name("hud-item hidden");
        document.body().unwrap().append_child(&el).unwrap();

        set_visible(&document, "hud-fps-test", true);
        assert_eq!(el.class_name(), "hud-item");

        set_visible(&document, "hud-fps-test", false);
        assert!(el.class_list().contains("hud-item"));
        assert!(el.class_list().contains("hidden"));

        // Missing elements are ignored
        set_visible(&document, "no-such-element", true);
    }
}
