use html::test_utils::{doc, elem, text};
use html::{Id, Node};
use input_core::SelectionRange;
use page_controls::{ControlsConfig, MemoryClipboard, Page, PageControls};
use pretty_assertions::assert_eq;

fn setup_with(tree: &Node, config: &ControlsConfig) -> (Page, PageControls, MemoryClipboard) {
    let mut page = Page::from_tree(tree).unwrap();
    let clipboard = MemoryClipboard::new();
    let controls = PageControls::new(config, clipboard.clone()).unwrap();
    controls.attach(&mut page);
    (page, controls, clipboard)
}

fn setup(tree: &Node) -> (Page, PageControls, MemoryClipboard) {
    setup_with(tree, &ControlsConfig::default())
}

fn clear_page() -> Node {
    doc(vec![
        elem(
            2,
            "div",
            vec![("class", "input-group")],
            vec![
                elem(3, "input", vec![("class", "form-control"), ("value", "p ∧ q")], vec![]),
                elem(4, "button", vec![("class", "clear-button")], vec![]),
            ],
        ),
        elem(
            5,
            "div",
            vec![("class", "input-group")],
            vec![
                elem(
                    6,
                    "div",
                    vec![("contenteditable", "true")],
                    vec![text(7, "a "), elem(8, "b", vec![], vec![text(9, "b")])],
                ),
                elem(10, "span", vec![("class", "clear-button"), ("tabindex", "-1")], vec![]),
            ],
        ),
        elem(11, "button", vec![("class", "clear-button"), ("data-target", "#notes")], vec![]),
        elem(12, "p", vec![("id", "notes")], vec![text(13, "scratch")]),
    ])
}

#[test]
fn clears_plain_field_in_group() {
    let (mut page, mut controls, _) = setup(&clear_page());
    page.fields_mut().set_selection_range(Id(3), 1, 3);

    page.click(Id(4));
    controls.run(&mut page);

    assert_eq!(page.fields().get(Id(3)), Some(""));
    assert_eq!(page.fields().selection(Id(3)), Some(SelectionRange::collapsed(0)));
    assert_eq!(page.focused(), Some(Id(3)));
}

#[test]
fn clears_rich_region_children() {
    let (mut page, mut controls, _) = setup(&clear_page());
    page.click(Id(10));
    controls.run(&mut page);

    assert!(page.document().children(Id(6)).is_empty());
    assert!(!page.document().is_live(Id(8)));
    assert_eq!(page.focused(), Some(Id(6)));
}

#[test]
fn clears_text_of_explicit_target() {
    let (mut page, mut controls, _) = setup(&clear_page());
    page.click(Id(11));
    controls.run(&mut page);
    assert_eq!(page.document().text_content(Id(12)), "");
}

#[test]
fn clear_ignores_last_focused_field() {
    let tree = doc(vec![
        elem(2, "textarea", vec![], vec![text(3, "keep")]),
        elem(4, "input", vec![("data-default-target", ""), ("value", "drop")], vec![]),
        elem(5, "button", vec![("class", "clear-button")], vec![]),
    ]);
    let (mut page, mut controls, _) = setup(&tree);
    page.focus(Id(2));
    controls.run(&mut page);

    page.click(Id(5));
    controls.run(&mut page);

    assert_eq!(page.fields().get(Id(2)), Some("keep"));
    assert_eq!(page.fields().get(Id(4)), Some(""));
}

#[test]
fn attach_marks_clear_and_copy_controls() {
    let tree = doc(vec![
        elem(2, "button", vec![("class", "clear-button")], vec![]),
        elem(3, "span", vec![("class", "copy-to-clipboard"), ("tabindex", "2")], vec![]),
    ]);
    let (page, _, _) = setup(&tree);
    let document = page.document();
    assert_eq!(document.attr(Id(2), "role"), Some("button"));
    assert_eq!(document.attr(Id(2), "tabindex"), Some("0"));
    assert_eq!(document.attr(Id(3), "role"), Some("button"));
    assert_eq!(document.attr(Id(3), "tabindex"), Some("2"));
}

#[test]
fn keyboard_activates_clear_control() {
    let (mut page, mut controls, _) = setup(&clear_page());
    page.key_down(Id(4), "Escape");
    controls.run(&mut page);
    assert_eq!(page.fields().get(Id(3)), Some("p ∧ q"));

    page.key_down(Id(4), " ");
    controls.run(&mut page);
    assert_eq!(page.fields().get(Id(3)), Some(""));
}

#[test]
fn visibility_follows_target_content() {
    let tree = doc(vec![
        elem(
            2,
            "div",
            vec![("class", "input-group")],
            vec![
                elem(3, "input", vec![("class", "form-control"), ("value", "x")], vec![]),
                elem(4, "button", vec![("class", "clear-button")], vec![]),
            ],
        ),
        elem(5, "button", vec![("data-symbol", "⊤")], vec![]),
    ]);
    let config = ControlsConfig::from_toml_str("[clear]\ntoggle_visibility = true\n").unwrap();
    let (mut page, mut controls, _) = setup_with(&tree, &config);
    assert!(!page.document().has_attr(Id(4), "hidden"));

    page.click(Id(4));
    controls.run(&mut page);
    assert!(page.document().has_attr(Id(4), "hidden"));

    // The clear left the field focused, so the symbol goes there.
    page.click(Id(5));
    controls.run(&mut page);
    assert_eq!(page.fields().get(Id(3)), Some("⊤"));
    assert!(!page.document().has_attr(Id(4), "hidden"));
}

fn copy_page() -> Node {
    doc(vec![
        elem(2, "code", vec![("class", "copy-to-clipboard")], vec![text(3, "  (p → q) ∧ p  ")]),
        elem(4, "span", vec![("class", "copy-to-clipboard")], vec![text(5, " ")]),
    ])
}

#[test]
fn copies_trimmed_text() {
    let (mut page, mut controls, clipboard) = setup(&copy_page());
    page.click(Id(3));
    controls.run(&mut page);
    assert_eq!(clipboard.contents().as_deref(), Some("(p → q) ∧ p"));
}

#[test]
fn blank_copy_writes_nothing() {
    let (mut page, mut controls, clipboard) = setup(&copy_page());
    page.click(Id(4));
    controls.run(&mut page);
    assert_eq!(clipboard.write_count(), 0);
}

#[test]
fn keyboard_activates_copy_control() {
    let (mut page, mut controls, clipboard) = setup(&copy_page());
    page.key_down(Id(2), "Enter");
    controls.run(&mut page);
    assert_eq!(clipboard.write_count(), 1);
}

#[test]
fn unavailable_clipboard_is_swallowed() {
    let mut page = Page::from_tree(&copy_page()).unwrap();
    let mut controls =
        PageControls::new(&ControlsConfig::default(), MemoryClipboard::unavailable()).unwrap();
    page.click(Id(2));
    assert_eq!(controls.run(&mut page), 1);
}
