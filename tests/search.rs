#[allow(dead_code)]
#[macro_use]
mod common;

use std::sync::Arc;

use color_eyre::Result;
use common::harness::{enter, enter_with, parse_options};
use typeahead::tui::Event;
use typeahead::tui::event::Action;
use typeahead::{QueryError, SearchResult, StaticCatalog};

typeahead_test!(nothing_is_searched_while_typing, &["--page", "search"], {
    @type "react";
    @wait 150;
    @assert(|h| !h.app().search.is_open() && !h.app().search.is_loading());
    @absent "React Basics";
    @wait 50;
    @contains "React Basics";
    @contains "React Hooks Demo";
    @absent "TypeScript Tutorial";
    @assert(|h| h.result_ids() == ["1", "5"]);
});

typeahead_test!(keyboard_selection, &["--page", "search"], {
    @type "react";
    @wait 200;
    @key Down;
    @key Down;
    @assert(|h| h.app().search.focused() == Some(1));
    @key Enter;
    @assert(|h| h.selected_id().as_deref() == Some("5"));
    @assert(|h| h.app().search.query().is_empty());
    @assert(|h| !h.app().search.is_open());
    @contains "Selected Item:";
    @contains "Selected React Hooks Demo";
});

typeahead_test!(results_are_listed_under_the_input, &["--page", "search"], {
    @type "react";
    @wait 200;
    @key Down;
    @snap r#"
    "Search                                                                          "
    "                                                                                "
    "┌──────────────────────────────────────────────────────────────────────────────┐"
    "│react                                                                      [x]│"
    "└──────────────────────────────────────────────────────────────────────────────┘"
    "┌──────────────────────────────────────────────────────────────────────────────┐"
    "│React Basics                                                          Frontend│"
    "│React Hooks Demo                                                      Frontend│"
    "└──────────────────────────────────────────────────────────────────────────────┘"
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "↑/↓ move · enter select · esc close/back · ctrl-x clear                         "
    cursor: (4, 7)
    "#;
    @assert(|h| h.app().search.focused() == Some(0));
});

typeahead_test!(keys_are_ignored_while_loading, &["--page", "search", "--latency", "300"], {
    @type "react";
    @wait 500;
    @key Down;
    @assert(|h| h.app().search.focused() == Some(0));
    @ctrl 'u';
    @type "typescript";
    @wait 200;
    @assert(|h| h.app().search.is_loading());
    @key Down;
    @assert(|h| h.app().search.focused().is_none());
    @key Enter;
    @assert(|h| h.selected_id().is_none());
    @assert(|h| h.app().page == typeahead::tui::Page::Search);
    @wait 300;
    @assert(|h| h.result_ids() == ["2"]);
    @key Down;
    @key Enter;
    @assert(|h| h.selected_id().as_deref() == Some("2"));
});

typeahead_test!(focus_wraps_around, &["--page", "search"], {
    @type "react";
    @wait 200;
    @key Up;
    @assert(|h| h.app().search.focused() == Some(1));
    @key Down;
    @assert(|h| h.app().search.focused() == Some(0));
});

typeahead_test!(loading_until_the_source_answers, &["--page", "search", "--latency", "300"], {
    @type "react";
    @wait 200;
    @snap r#"
    "Search                                                                          "
    "                                                                                "
    "┌──────────────────────────────────────────────────────────────────────────────┐"
    "│react                                                                      [x]│"
    "└──────────────────────────────────────────────────────────────────────────────┘"
    "┌──────────────────────────────────────────────────────────────────────────────┐"
    "│Loading...                                                                    │"
    "└──────────────────────────────────────────────────────────────────────────────┘"
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "                                                                                "
    "↑/↓ move · enter select · esc close/back · ctrl-x clear                         "
    cursor: (4, 7)
    "#;
    @assert(|h| h.app().search.is_loading());
    @wait 299;
    @contains "Loading...";
    @wait 1;
    @absent "Loading...";
    @contains "React Basics";
});

typeahead_test!(no_results_indicator, &["--page", "search"], {
    @type "nonexistent";
    @wait 200;
    @contains "No results found.";
    @assert(|h| h.app().search.is_open() && h.result_ids().is_empty());
});

typeahead_test!(blank_query_closes_the_dropdown, &["--page", "search"], {
    @type "react";
    @wait 200;
    @assert(|h| h.app().search.is_open());
    @ctrl 'u';
    @type "   ";
    @wait 200;
    @assert(|h| !h.app().search.is_open());
    @absent "No results found.";
});

typeahead_test!(escape_closes_then_goes_back, &["--page", "search"], {
    @type "react";
    @wait 200;
    @key Esc;
    @assert(|h| !h.app().search.is_open());
    @assert(|h| h.app().search.query() == "react");
    @assert(|h| h.app().page == typeahead::tui::Page::Search);
    @key Esc;
    @assert(|h| h.app().page == typeahead::tui::Page::Welcome);
});

typeahead_test!(clear_forgets_the_selection, &["--page", "search"], {
    @type "css";
    @wait 200;
    @key Down;
    @key Enter;
    @assert(|h| h.selected_id().as_deref() == Some("4"));
    @type "rust";
    @ctrl 'x';
    @assert(|h| h.selected_id().is_none());
    @assert(|h| h.app().search.query().is_empty());
    @absent "Selected Item:";
});

typeahead_test!(typing_q_does_not_quit_on_the_search_page, &["--page", "search"], {
    @type "q";
    @assert(|h| h.app_exit_code().is_none());
    @assert(|h| h.app().search.query() == "q");
});

#[tokio::test(start_paused = true)]
async fn only_the_newest_query_is_shown() -> Result<()> {
    let mut h = enter(parse_options(&["--page", "search", "--latency", "300"]))?;
    h.type_str("react")?;
    h.advance(200).await?;
    assert!(h.app().search.is_loading());

    h.action(Action::SetQuery("typescript".into()))?;
    // the react answer would have arrived by now
    h.advance(350).await?;
    assert!(h.app().search.is_loading());
    assert!(h.result_ids().is_empty());

    // the newer query is committed when its timer event is processed
    h.advance(300).await?;
    assert_eq!(h.result_ids(), ["2"]);
    assert_eq!(h.app().search.debounced_query(), "typescript");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn click_on_a_result_selects_it() -> Result<()> {
    let mut h = enter(parse_options(&["--page", "search"]))?;
    h.type_str("react")?;
    h.advance(200).await?;
    let row = h.find_row("React Hooks Demo")?.expect("result row is drawn");
    h.click(3, row)?;
    assert_eq!(h.selected_id().as_deref(), Some("5"));
    assert!(!h.app().search.is_open());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn clear_button_empties_the_input() -> Result<()> {
    let mut h = enter(parse_options(&["--page", "search"]))?;
    h.type_str("react")?;
    h.advance(200).await?;
    let rows = h.rows()?;
    let y = rows.iter().position(|r| r.contains("[x]")).expect("clear button is drawn");
    let x = rows[y].chars().collect::<Vec<_>>().windows(3).position(|w| w == ['[', 'x', ']']);
    h.click(x.expect("clear button column") as u16 + 1, y as u16)?;
    assert!(h.app().search.query().is_empty());
    assert!(!h.app().search.is_open());
    assert!(h.result_ids().is_empty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn failures_are_shown_in_the_dropdown() -> Result<()> {
    let source = |text: &str| -> Result<Vec<Arc<SearchResult>>, QueryError> {
        if text == "boom" {
            Err(QueryError::Failed("backend exploded".into()))
        } else {
            Ok(StaticCatalog::demo().search(text))
        }
    };
    let mut h = enter_with(parse_options(&["--page", "search"]), Arc::new(source), 80, 24)?;
    h.type_str("boom")?;
    h.advance(200).await?;
    assert_eq!(h.app().search.error(), Some("backend exploded"));
    assert!(h.screen()?.contains("backend exploded"));
    // navigation keys are ignored while the error is shown
    h.key(crossterm::event::KeyEvent::from(crossterm::event::KeyCode::Down))?;
    assert_eq!(h.app().search.focused(), None);

    h.action(Action::ClearQuery)?;
    h.type_str("docker")?;
    h.advance(200).await?;
    assert_eq!(h.app().search.error(), None);
    assert_eq!(h.result_ids(), ["8"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn paste_is_debounced_like_typing() -> Result<()> {
    let mut h = enter(parse_options(&["--page", "search"]))?;
    h.send(Event::Paste("node\n".into()))?;
    h.tick()?;
    assert_eq!(h.app().search.query(), "node");
    assert!(h.app().search.is_debouncing());
    h.advance(200).await?;
    assert_eq!(h.result_ids(), ["3"]);
    Ok(())
}
