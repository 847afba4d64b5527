/// Wrapping and pagination properties over varied text and box sizes.
use chatterbox::core::text_wrap::{paginate, wrap_lines};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const WORDS: &[&str] = &[
    "a", "to", "the", "doop", "dee", "doo", "whoop", "text", "going", "thingy", "promptly",
    "keep", "wheee!", "this", "is", "some", "more", "appear", "should",
];

/// Random prose with occasional paragraph breaks and one overlong word.
fn random_text(rng: &mut StdRng, words: usize) -> String {
    let mut text = String::new();
    for i in 0..words {
        if i > 0 {
            if rng.gen_bool(0.05) {
                text.push_str("\n\n");
            } else {
                text.push(' ');
            }
        }
        if rng.gen_bool(0.02) {
            text.push_str("antidisestablishmentarianism");
        } else {
            text.push_str(WORDS[rng.gen_range(0..WORDS.len())]);
        }
    }
    text
}

#[test]
fn lines_fit_unless_a_single_word_is_too_long() {
    let mut rng = StdRng::seed_from_u64(1234);
    for _ in 0..200 {
        let width = rng.gen_range(6..40);
        let text = random_text(&mut rng, 80);
        for line in wrap_lines(&text, width) {
            let len = line.chars().count();
            if len > width {
                assert!(
                    !line.trim().contains(' '),
                    "line {:?} exceeds {} but is not a single word",
                    line,
                    width
                );
            }
        }
    }
}

#[test]
fn wrapping_keeps_every_word_in_order() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..100 {
        let width = rng.gen_range(4..30);
        let text = random_text(&mut rng, 60);
        let original: Vec<&str> = text.split_whitespace().collect();
        let lines = wrap_lines(&text, width);
        let wrapped: Vec<&str> = lines.iter().flat_map(|l| l.split_whitespace()).collect();
        assert_eq!(original, wrapped);
    }
}

#[test]
fn pages_rejoin_to_wrapped_lines() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..100 {
        let width = rng.gen_range(8..30);
        let lines_per_box = rng.gen_range(2..8);
        // No paragraph breaks, so trimming never drops a blank line.
        let text: String = (0..60)
            .map(|_| WORDS[rng.gen_range(0..WORDS.len())])
            .collect::<Vec<_>>()
            .join(" ");

        let lines = wrap_lines(&text, width);
        let pages = paginate(&text, width, lines_per_box);

        let rejoined: Vec<String> = pages
            .iter()
            .flat_map(|p| p.lines().map(str::to_string))
            .collect();
        let expected: Vec<String> = lines.iter().map(|l| l.trim().to_string()).collect();
        assert_eq!(rejoined, expected);

        for page in &pages[..pages.len() - 1] {
            assert_eq!(page.lines().count(), lines_per_box - 1);
        }
        assert!(pages.last().unwrap().lines().count() <= lines_per_box - 1);
    }
}

#[test]
fn paragraph_breaks_survive_pagination() {
    let text = "First paragraph here.\n\nSecond paragraph here.";
    let pages = paginate(text, 28, 17);
    assert_eq!(pages, vec!["First paragraph here.\n\nSecond paragraph here."]);
}

#[test]
fn dialogue_box_defaults() {
    let text = "This is some test text. Whoop dee doo! It should appear promptly. Here is some more text. Wheee! This is a thingy. \
                This text is going to keep going. Doop dee doo. This text is going to keep going.\n\nDoop dee doo. \
                This text is going to keep going. Doop dee doo. This text is going to keep going. Doop dee doo. \
                This text is going to keep going. Doop dee doo. This text is going to keep going.\n\nDoop dee doo. \
                This text is going to keep going. Doop dee doo. This text is going to keep going. Doop dee doo. ";
    let pages = paginate(text, 28, 17);
    assert!(pages.len() >= 2);
    for page in &pages {
        assert!(page.lines().count() <= 16);
        for line in page.lines() {
            assert!(line.chars().count() <= 28);
        }
        assert_eq!(page.trim(), page.as_str());
    }
}
