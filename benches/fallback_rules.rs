use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::time::Duration;
use switchboard::core::dispatch::DispatchRequest;
use switchboard::core::fallback::{classify, FallbackSynthesizer};
use switchboard::core::persona::{ContextParams, Persona};

const PROMPTS: &[&str] = &[
    "why did revenue drop last week",
    "what would it cost to scale to 10x",
    "review our architecture for single points of failure",
    "we saw a spike of 502s after the deploy, what is the root cause",
    "check this webhook handler for bugs",
    "hello there, what can you do",
];

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    group.throughput(Throughput::Elements(PROMPTS.len() as u64));

    for persona in Persona::ALL {
        group.bench_function(BenchmarkId::from_parameter(persona.id()), |b| {
            b.iter(|| {
                for prompt in PROMPTS {
                    black_box(classify(persona, black_box(prompt)));
                }
            })
        });
    }
    group.finish();
}

fn bench_compose(c: &mut Criterion) {
    let synthesizer = FallbackSynthesizer::new(Duration::ZERO);
    let mut group = c.benchmark_group("compose");

    for &multiplier in &[1u32, 4, 100] {
        let request = DispatchRequest {
            persona: Persona::Infrastructure,
            text: "can we scale for the holiday peak".to_string(),
            session_token: Some("sess-bench".to_string()),
            params: ContextParams::new(Some("m-bench".to_string()), multiplier),
        };
        group.bench_function(BenchmarkId::new("infra_scale", multiplier), |b| {
            b.iter(|| black_box(synthesizer.compose(black_box(&request))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_classify, bench_compose);
criterion_main!(benches);
