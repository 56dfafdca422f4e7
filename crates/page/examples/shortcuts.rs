//! Shortcuts example - restructure a page, then drive the console from the keyboard
//!
//! Run with `RUST_LOG=debug` to see every mutation.

use domkit::{apply_style, Document, UnwrapOptions, WrapperSpec};
use domkit_page::{KeyPress, Page, PageConfig, PageEvent};
use keyboard_types::Modifiers;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let document = Document::from_json_str(
        r#"{"tag":"body","children":[
            {"tag":"h1","children":["Menu"]},
            {"tag":"a","attributes":{"id":"home","href":"/"},"children":["Home"]},
            {"tag":"footer"}
        ]}"#,
    )?;
    let mut page = Page::with_document(PageConfig::default(), document);
    let mut events = page.event_bus.subscribe();

    let specs = vec![WrapperSpec::new("li"), WrapperSpec::new("ul"), WrapperSpec::new("nav")];
    page.wrap_deeply("#home", &specs, true)?;
    page.print_ancestors("#home");

    apply_style(page.document_mut(), "nav", &[("backgroundColor", "#eee")])?;
    apply_style(page.document_mut(), "#home", &[("fontWeight", "bold")])?;

    let ctrl_alt = Modifiers::CONTROL | Modifiers::ALT;
    page.handle_key(&KeyPress::character('s', ctrl_alt));
    for line in page.console().lines() {
        println!("{}", line);
    }

    page.unwrap("#home", UnwrapOptions::levels(3))?;
    page.handle_key(&KeyPress::character('l', ctrl_alt));
    println!("console lines after clear: {}", page.console().len());

    while let Ok(event) = events.try_recv() {
        if let PageEvent::Unwrapped { node, boundary } = event {
            println!("node {} left {}", node, boundary);
        }
    }

    Ok(())
}
