use crate::{
    devices::{ActionSink, Clock, EventSource},
    resolver::{Resolver, StreakPolicy},
};

/// Will run a single iteration of the firmware main loop, every scanned event
/// is resolved and dispatched, then the housekeeping tick runs.
///
/// Returns the amount of key events handled.
pub fn scan_cycle<P, E, A, C>(resolver: &mut Resolver<P>, source: &mut E, sink: &mut A, clock: &C) -> usize
where
    P: StreakPolicy,
    E: EventSource,
    A: ActionSink,
    C: Clock,
{
    let mut handled = 0;
    while let Some(event) = source.poll() {
        for action in resolver.on_key_event(event) {
            sink.dispatch(action);
        }
        handled += 1;
    }

    for action in resolver.on_tick(clock.now()) {
        sink.dispatch(action);
    }
    handled
}

#[cfg(test)]
mod tests {
    use mockall::{predicate::eq, Sequence};

    use super::*;
    use crate::{
        devices::{EventQueue, MockActionSink, MockClock, MockEventSource},
        event::{KeyEvent, OutputAction},
        keycode::{Keycode, ModifierSet},
        keymap::Keymap,
    };

    fn keymap() -> Keymap {
        let mut keymap = Keymap::new();
        keymap
            .bind_str(0, "MT(MOD_LSFT, KC_F)")
            .and_then(|keymap| keymap.bind_str(1, "KC_G"))
            .expect("valid keymap");
        keymap
    }

    #[test]
    fn test_cycle_dispatches_in_order() {
        let mut resolver = Resolver::new(keymap());

        let mut source = MockEventSource::new();
        let mut events = vec![KeyEvent::press(0, 0), KeyEvent::press(1, 30)].into_iter();
        source.expect_poll().times(3).returning(move || events.next());

        let mut seq = Sequence::new();
        let mut sink = MockActionSink::new();
        sink.expect_dispatch()
            .with(eq(OutputAction::EmitModifier(ModifierSet::LSFT)))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        sink.expect_dispatch()
            .with(eq(OutputAction::Emit(Keycode::G)))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let mut clock = MockClock::new();
        clock.expect_now().times(1).return_const(40u32);

        assert_eq!(2, scan_cycle(&mut resolver, &mut source, &mut sink, &clock));
    }

    #[test]
    fn test_tick_times_out_pending_key() {
        let mut resolver = Resolver::new(keymap());
        let mut queue = EventQueue::new();
        let mut sink: Vec<OutputAction> = Vec::new();

        let mut clock = MockClock::new();
        let mut now = vec![10u32, 199, 200].into_iter();
        clock.expect_now().times(3).returning(move || now.next().unwrap_or_default());

        queue.push(KeyEvent::press(0, 0));
        assert_eq!(1, scan_cycle(&mut resolver, &mut queue, &mut sink, &clock));
        assert_eq!(0, scan_cycle(&mut resolver, &mut queue, &mut sink, &clock));
        assert!(sink.is_empty());

        assert_eq!(0, scan_cycle(&mut resolver, &mut queue, &mut sink, &clock));
        assert_eq!(vec![OutputAction::EmitModifier(ModifierSet::LSFT)], sink);
    }
}
