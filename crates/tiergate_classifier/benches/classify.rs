use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tiergate_classifier::{Classifier, ClassifyContext};

const PARAGRAPH: &str = "First, analyze the existing authentication module in src/auth.rs and compare \
    the trade-offs of JWT versus session cookies. Then implement the refactor step by step:\n\
    1. Migrate the session store to Redis\n\
    2. Integrate the new token service\n\
    3. Deploy behind a feature flag\n\
    ```rust\nasync fn rotate(store: &Store) -> Result<(), Error> { store.rotate().await }\n```\n\
    Finally, write integration tests and debug any failing cases. Why does it leak?\n";

fn bench_classify(c: &mut Criterion) {
    let classifier = Classifier::default();
    let context = ClassifyContext {
        system_prompt: Some("You are a careful reviewer. You must never guess."),
        message_count: Some(12),
    };

    c.bench_function("classify_greeting", |b| {
        b.iter(|| classifier.classify(black_box("hello"), &context))
    });

    let two_kb = PARAGRAPH.repeat(2_048 / PARAGRAPH.len() + 1);
    c.bench_function("classify_2kb", |b| {
        b.iter(|| classifier.classify(black_box(&two_kb), &context))
    });

    let fifty_kb = PARAGRAPH.repeat(50 * 1_024 / PARAGRAPH.len() + 1);
    c.bench_function("classify_50kb", |b| {
        b.iter(|| classifier.classify(black_box(&fifty_kb), &context))
    });
}

criterion_group!(benches, bench_classify);
criterion_main!(benches);
