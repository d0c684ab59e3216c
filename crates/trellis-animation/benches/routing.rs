use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trellis_animation::{Animatable, Transition, TransitionError, Transitions};
use trellis_core::{AnyValue, BindingPriority, PropertyId, StyledProperty};
use trellis_testing::FrameHarness;

const REGISTRY_SIZES: &[usize] = &[1, 4, 16, 64, 256];

/// Matches like any other entry but never starts a sequence, so only the
/// routing itself is measured.
struct Inert(PropertyId);

impl Transition for Inert {
    fn property(&self) -> PropertyId {
        self.0
    }

    fn apply(&self, _: &Animatable, _: &AnyValue, _: &AnyValue) -> Result<(), TransitionError> {
        Ok(())
    }
}

struct RoutingFixture {
    _harness: FrameHarness,
    target: Animatable,
    properties: Vec<StyledProperty<f64>>,
    unmatched: StyledProperty<f64>,
}

impl RoutingFixture {
    fn new(size: usize) -> Self {
        let harness = FrameHarness::new();
        let target = Animatable::new(harness.handle());
        let properties: Vec<StyledProperty<f64>> = (0..size)
            .map(|_| StyledProperty::register("Bench", "Value", 0.0))
            .collect();
        let transitions: Transitions = properties
            .iter()
            .map(|property| std::rc::Rc::new(Inert(property.id())) as std::rc::Rc<dyn Transition>)
            .collect();
        target.set_transitions(transitions).expect("install registry");
        Self {
            _harness: harness,
            target,
            properties,
            unmatched: StyledProperty::register("Bench", "Unmatched", 0.0),
        }
    }

    /// The property found last by a first-match scan.
    fn last(&self) -> &StyledProperty<f64> {
        self.properties.last().expect("non-empty registry")
    }
}

fn bench_matched_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("routing_matched");
    for &size in REGISTRY_SIZES {
        group.bench_with_input(BenchmarkId::new("registry", size), &size, |b, &size| {
            let fixture = RoutingFixture::new(size);
            let mut value = 0.0;
            b.iter(|| {
                value += 1.0;
                fixture
                    .target
                    .set_value(fixture.last(), black_box(value))
                    .expect("routed write");
            });
        });
    }
    group.finish();
}

fn bench_unmatched_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("routing_unmatched");
    for &size in REGISTRY_SIZES {
        group.bench_with_input(BenchmarkId::new("registry", size), &size, |b, &size| {
            let fixture = RoutingFixture::new(size);
            let mut value = 0.0;
            b.iter(|| {
                value += 1.0;
                fixture
                    .target
                    .set_value(&fixture.unmatched, black_box(value))
                    .expect("routed write");
            });
        });
    }
    group.finish();
}

fn bench_animation_write(c: &mut Criterion) {
    let fixture = RoutingFixture::new(256);
    let mut value = 0.0;
    c.bench_function("routing_animation_write", |b| {
        b.iter(|| {
            value += 1.0;
            fixture
                .target
                .set_value_with_priority(fixture.last(), black_box(value), BindingPriority::Animation)
                .expect("animation write");
        });
    });
}

criterion_group!(
    routing,
    bench_matched_write,
    bench_unmatched_write,
    bench_animation_write
);
criterion_main!(routing);
