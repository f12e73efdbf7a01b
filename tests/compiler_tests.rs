//! Deck syntax tests.
//!
//! Exercises the compiler through `Deck::build`: suit headers, scoping,
//! comments and continuations, vector and slice expansion, and the errors
//! reported for malformed input.

use rummy::{CompilerConfig, Deck, DeckError};

fn build(text: &str) -> Deck {
    let mut deck = Deck::new();
    deck.build(text).expect("deck should build");
    deck
}

fn build_err(text: &str) -> DeckError {
    Deck::new().build(text).expect_err("deck should fail to build")
}

// =============================================================================
// Suits
// =============================================================================

#[test]
fn test_relative_suits() {
    let deck = build("<a/b>\nx = 1\n<../c>\ny = a.b.x + 1\n");
    assert!(deck.cards().suit_exists("a/b"));
    assert!(deck.cards().suit_exists("a/c"));
    assert_eq!(deck.get_card_value::<f64>("a/c", "y").unwrap(), 2.0);
}

#[test]
fn test_dotted_suit_header() {
    let deck = build("<phys.fluid>\nrho = 1000\n");
    assert_eq!(deck.get_card_value::<f64>("phys/fluid", "rho").unwrap(), 1000.0);
}

#[test]
fn test_suit_isolation() {
    let err = build_err("<a>\nx = 1\n<b>\ny = x\n");
    assert!(matches!(err, DeckError::Expression { .. }));
    assert_eq!(err.line(), Some(4));
    assert_eq!(err.location().map(|at| at.suit.as_str()), Some("b"));
}

#[test]
fn test_root_globals_visible_everywhere() {
    let deck = build("g = 3\n<a>\nx = g * 2\n<b>\ny = g + a.x\n");
    assert_eq!(deck.get_card_value::<f64>("b", "y").unwrap(), 9.0);
}

#[test]
fn test_forward_reference_fails() {
    let err = build_err("<a>\nx = y\ny = 1\n");
    assert!(matches!(err, DeckError::Expression { .. }));
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_malformed_header() {
    let err = build_err("x = 1\n\n<foo\ny = 2\n");
    assert!(matches!(err, DeckError::MalformedSuitHeader { .. }));
    assert_eq!(err.line(), Some(3));
}

#[test]
fn test_dangling_relative_suit() {
    assert!(matches!(
        build_err("<../c>\nx = 1\n"),
        DeckError::DanglingRelativeSuit { .. }
    ));
}

#[test]
fn test_empty_suit_is_kept() {
    let deck = build("<empty>\n<full>\nx = 1\n");
    assert!(deck.cards().suit_exists("empty"));
    assert!(deck.cards().find_suit("empty").unwrap().is_empty());
}

// =============================================================================
// Lines and Comments
// =============================================================================

#[test]
fn test_continuation_and_comments() {
    let deck = build(
        "# header comment\n\
         <s>\n\
         v = 1, &\n    2, &\n    3   # three values\n\
         w = 4\n",
    );
    assert_eq!(deck.get_vector::<f64>("s", "v").unwrap(), vec![1.0, 2.0, 3.0]);

    let first = deck.get_card("s", "v[0]").unwrap();
    assert_eq!(first.line, Some(3));
    assert_eq!(first.comment(), Some("three values"));
    assert_eq!(deck.get_card("s", "v[2]").unwrap().comment(), None);
    assert_eq!(deck.get_card("s", "w").unwrap().line, Some(6));

    let text = deck.to_deck_string();
    assert_eq!(text, "<s>\nv[0] = 1  # three values\nv[1] = 2\nv[2] = 3\nw = 4\n\n");
}

#[test]
fn test_comment_char_in_string() {
    let deck = build("tag = \"#1 & co\"  # note\n");
    assert_eq!(deck.get_card_value::<String>("/", "tag").unwrap(), "#1 & co");
    assert_eq!(deck.get_card("/", "tag").unwrap().comment(), Some("note"));
}

#[test]
fn test_unterminated_quote() {
    let err = build_err("a = 1\nname = \"open\n");
    assert!(matches!(err, DeckError::UnterminatedQuote { .. }));
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_missing_equals_hint() {
    match build_err("x 1\n") {
        DeckError::Expression { hint, .. } => assert!(hint.is_some()),
        other => panic!("expected expression error, got {other:?}"),
    }
}

#[test]
fn test_invalid_card_name() {
    assert!(matches!(build_err("a, b = 1\n"), DeckError::InvalidCardName { .. }));
}

#[test]
fn test_print_output() {
    let mut deck = Deck::new();
    deck.build("x = 6\nprint(\"x is\", x * 7)\n").unwrap();
    assert_eq!(deck.evaluator_mut().take_output(), vec!["x is 42".to_string()]);
    assert_eq!(deck.cards().len(), 1);
}

// =============================================================================
// Vectors and Slices
// =============================================================================

#[test]
fn test_vector_literal_forms() {
    let deck = build("a = [1, 2, 3]\nb = 4, 5\nc = [6]\n");
    assert_eq!(deck.get_vector::<i64>("/", "a").unwrap(), vec![1, 2, 3]);
    assert_eq!(deck.get_vector::<i64>("/", "b").unwrap(), vec![4, 5]);
    assert_eq!(deck.get_vector::<i64>("/", "c").unwrap(), vec![6]);
}

#[test]
fn test_quoted_commas_in_vector() {
    let deck = build("name = \"a, b\", \"c\"\n");
    assert_eq!(deck.cards().find_card_fuzzy("/", "name").unwrap().len(), 2);
}

#[test]
fn test_slice_copy() {
    let deck = build("a = 1, 2, 3, 4\nb[:] = a[:3]\n");
    assert_eq!(deck.get_vector::<f64>("/", "b").unwrap(), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_open_slice_copy_of_existing_vector() {
    let deck = build("c = [1, 2, 3]\nd[:] = c[:]\n<s>\ne[:] = 2 * c[1:]\n");
    assert_eq!(deck.get_vector::<f64>("/", "d").unwrap(), vec![1.0, 2.0, 3.0]);
    assert_eq!(deck.get_vector::<f64>("s", "e").unwrap(), vec![4.0, 6.0]);
}

#[test]
fn test_slice_broadcast() {
    let deck = build("<s>\nzeros[0:4] = 0\n");
    assert_eq!(deck.get_vector::<f64>("s", "zeros").unwrap(), vec![0.0; 4]);
}

#[test]
fn test_slice_with_expression() {
    let deck = build("<s>\nx = 1, 2, 3\ny[:] = 10 * x[:3]\n");
    assert_eq!(deck.get_vector::<f64>("s", "y").unwrap(), vec![10.0, 20.0, 30.0]);
}

#[test]
fn test_partial_slice_overwrite() {
    let deck = build("v = 1, 2, 3, 4\nv[1:3] = 9\n");
    assert_eq!(deck.get_vector::<f64>("/", "v").unwrap(), vec![1.0, 9.0, 9.0, 4.0]);
}

#[test]
fn test_slice_from_values() {
    let deck = build("<s>\nv[:] = 5, 6, 7\n");
    assert_eq!(deck.get_vector::<f64>("s", "v").unwrap(), vec![5.0, 6.0, 7.0]);
}

#[test]
fn test_offset_slice_leaves_gap() {
    let deck = build("w[2:4] = 1\n");
    assert_eq!(deck.get_card_value::<f64>("/", "w[3]").unwrap(), 1.0);
    assert!(matches!(
        deck.get_vector::<f64>("/", "w"),
        Err(DeckError::CardNotFound { .. })
    ));
}

#[test]
fn test_slice_errors() {
    assert!(matches!(build_err("a[:] = b\n"), DeckError::MissingSliceUpperBound { .. }));
    assert!(matches!(build_err("a[3:1] = 0\n"), DeckError::InvalidSliceBound { .. }));
    assert!(matches!(build_err("a[x:2] = 0\n"), DeckError::InvalidSliceBound { .. }));
    assert!(matches!(build_err("a[0] = 1, 2\n"), DeckError::MalformedVectorSyntax { .. }));
    assert!(matches!(
        build_err(&format!("a[{}:] = b[0:2]\n", usize::MAX)),
        DeckError::InvalidSliceBound { .. }
    ));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_custom_config() {
    let config = CompilerConfig::default()
        .with_comment_char('!')
        .with_continuation_char('\\')
        .with_suit_delimiters('{', '}');
    let mut deck = Deck::with_config(config);
    deck.build("{phys}\nx = 1 + \\\n  2  ! three\n").unwrap();

    let card = deck.get_card("phys", "x").unwrap();
    assert_eq!(card.get::<f64>().unwrap(), 3.0);
    assert_eq!(card.comment(), Some("three"));
}
