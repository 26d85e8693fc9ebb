use std::sync::Arc;
use std::thread;

use service_tracking::{
    DefaultCustomizer, ServiceEvent, ServiceHandle, ServiceReference, ServiceTrackerCustomizer,
    SlotChange, TrackedSlots,
};
use test_support::{init_logging, Counter, MemoryContext, RecordingCustomizer, Tally};

const SERVICES: usize = 16;

#[test]
fn distinct_services_add_concurrently() {
    init_logging();
    let context = MemoryContext::new();
    let references: Vec<ServiceReference<dyn Counter>> = (0..SERVICES)
        .map(|i| context.register_as(Arc::new(Tally::default()) as Arc<dyn Counter>, i as i32))
        .collect();
    let customizer = RecordingCustomizer::new(DefaultCustomizer::new(&context));
    let shared: &dyn ServiceTrackerCustomizer<dyn Counter> = &customizer;

    let handles: Vec<ServiceHandle<dyn Counter>> = thread::scope(|scope| {
        let workers: Vec<_> = references
            .iter()
            .map(|reference| scope.spawn(move || shared.adding_service(reference)))
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().expect("worker panicked").expect("add"))
            .collect()
    });

    assert!(handles.iter().all(|handle| !handle.is_null()));
    assert_eq!(customizer.calls().len(), SERVICES);
    for (reference, handle) in references.iter().zip(&handles) {
        shared.removed_service(reference, handle);
    }
    assert_eq!(context.released().len(), SERVICES);
}

#[test]
fn slots_behind_a_mutex_serve_many_threads() {
    init_logging();
    let context = Arc::new(MemoryContext::new());
    let customizer = Arc::new(DefaultCustomizer::new(Arc::clone(&context)));
    let slots = Arc::new(std::sync::Mutex::new(
        TrackedSlots::<dyn Counter, ServiceHandle<dyn Counter>>::new(),
    ));

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let context = Arc::clone(&context);
            let customizer = Arc::clone(&customizer);
            let slots = Arc::clone(&slots);
            thread::spawn(move || {
                for _ in 0..4 {
                    let reference = context
                        .register_as(Arc::new(Tally::default()) as Arc<dyn Counter>, worker);
                    let change = slots
                        .lock()
                        .expect("slots lock")
                        .apply(&customizer, ServiceEvent::Registered(reference))
                        .expect("apply");
                    assert_eq!(change, SlotChange::Added);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker panicked");
    }

    let mut slots = slots.lock().expect("slots lock");
    assert_eq!(slots.len(), 16);
    let (best, _) = slots.highest_ranked().expect("tracked");
    assert_eq!(best.ranking(), 3);
    assert_eq!(slots.close(&customizer), 16);
    assert_eq!(context.released().len(), 16);
}
