use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Event, HtmlSelectElement};
use yew::Renderer;

use cinema_web::app::App;
use cinema_web::dom;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn ensure_app_root() -> web_sys::Element {
    let doc = dom::document().expect("document");
    if let Some(root) = doc.get_element_by_id("app") {
        root.set_inner_html("");
        return root;
    }
    let root = doc.create_element("div").expect("create app root");
    root.set_id("app");
    doc.body()
        .expect("document body")
        .append_child(&root)
        .expect("append app root");
    root
}

fn render_app() {
    cinema_web::i18n::set_lang("en");
    Renderer::<App>::with_root(ensure_app_root()).render();
}

#[wasm_bindgen_test]
fn skip_link_points_to_main_landmark() {
    render_app();
    let doc = dom::document().expect("document");
    let skip = doc
        .query_selector("a[href='#main']")
        .expect("query skip link")
        .expect("skip link exists");
    let main = doc.get_element_by_id("main").expect("main landmark exists");
    assert_eq!(main.tag_name(), "MAIN");
    assert_eq!(skip.get_attribute("href").unwrap_or_default(), "#main");
}

#[wasm_bindgen_test]
fn language_select_updates_document_lang() {
    render_app();
    let doc = dom::document().expect("document");
    let select: HtmlSelectElement = doc
        .get_element_by_id("lang-select")
        .expect("lang select")
        .dyn_into()
        .expect("cast to select");
    select.set_value("vi");
    select
        .dispatch_event(&Event::new("change").expect("change event"))
        .expect("dispatch change");
    let html = doc.document_element().expect("document element");
    assert_eq!(html.get_attribute("lang"), Some("vi".into()));

    select.set_value("en");
    select
        .dispatch_event(&Event::new("change").expect("change event"))
        .expect("dispatch change");
    assert_eq!(html.get_attribute("lang"), Some("en".into()));
}

#[wasm_bindgen_test]
fn guests_see_sign_in_and_no_admin_links() {
    dom::local_storage()
        .expect("local storage")
        .clear()
        .expect("clear storage");
    render_app();
    let doc = dom::document().expect("document");
    let nav = doc
        .query_selector(".header-nav")
        .expect("query nav")
        .expect("nav exists");
    let text = nav.text_content().unwrap_or_default();
    assert!(!text.contains("Admin"));
    assert!(!text.contains("Counter sales"));
}
