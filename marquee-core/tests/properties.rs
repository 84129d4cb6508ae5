//! Property tests for message selection

use marquee_core::display::DisplayTask;
use marquee_core::message::{
    text_from, Content, MessageDescriptor, MessageQueues, OwnerId, SelectionSource,
    MAX_REGULAR_MESSAGES, PRIORITY_QUEUE_LEN,
};
use marquee_core::task::{SlowTaskGate, Task, TickContext};
use marquee_core::time::{Duration, Instant};
use marquee_core::traits::{NoClock, ScrollRenderer};
use proptest::prelude::*;

fn entry(owner: u8, text: &str) -> MessageDescriptor<'static> {
    MessageDescriptor::regular(
        OwnerId(owner),
        Content::Static(text_from(text)),
        Duration::from_secs(1),
        1,
        false,
    )
}

struct NullRenderer;

impl ScrollRenderer for NullRenderer {
    fn render_string(&mut self, _text: &str) {}

    fn tick(&mut self) -> bool {
        true
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn priority_messages_come_out_in_push_order(count in 1usize..=PRIORITY_QUEUE_LEN) {
        let mut queues = MessageQueues::new();
        queues.add_regular(entry(1, "regular")).unwrap();
        for i in 0..count {
            let text = format!("p{i}");
            queues
                .push_priority(MessageDescriptor::transient(&text, Duration::from_secs(1), false))
                .unwrap();
        }

        for i in 0..count {
            let selection = queues.select(&NoClock);
            prop_assert_eq!(selection.source, SelectionSource::Priority);
            let text = selection.descriptor.content.produce(&NoClock);
            let expected = format!("p{i}");
            prop_assert_eq!(text.as_str(), expected.as_str());
        }
        prop_assert_eq!(queues.select(&NoClock).source, SelectionSource::Regular(0));
    }

    #[test]
    fn one_lap_visits_every_non_empty_entry_once(
        filled in proptest::collection::vec(any::<bool>(), 1..=MAX_REGULAR_MESSAGES),
        start in 0usize..MAX_REGULAR_MESSAGES,
    ) {
        let mut queues = MessageQueues::new();
        for (i, has_text) in filled.iter().enumerate() {
            let text = if *has_text { format!("m{i}") } else { String::new() };
            queues.add_regular(entry(1, &text)).unwrap();
        }

        // Advance to an arbitrary rotation position first
        for _ in 0..start {
            queues.select(&NoClock);
        }

        let expected: Vec<usize> = (0..filled.len()).filter(|&i| filled[i]).collect();
        if expected.is_empty() {
            prop_assert_eq!(queues.select(&NoClock).source, SelectionSource::Idle);
            return Ok(());
        }

        let mut seen: Vec<usize> = (0..expected.len())
            .map(|_| match queues.select(&NoClock).source {
                SelectionSource::Regular(slot) => slot,
                other => panic!("unexpected source {other:?}"),
            })
            .collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn rewind_restarts_at_first_non_empty(
        filled in proptest::collection::vec(any::<bool>(), 1..=MAX_REGULAR_MESSAGES),
        advance in 0usize..8,
    ) {
        let mut queues = MessageQueues::new();
        for (i, has_text) in filled.iter().enumerate() {
            let text = if *has_text { format!("m{i}") } else { String::new() };
            queues.add_regular(entry(1, &text)).unwrap();
        }
        for _ in 0..advance {
            queues.select(&NoClock);
        }

        queues.rewind();
        let expected = match filled.iter().position(|f| *f) {
            Some(slot) => SelectionSource::Regular(slot),
            None => SelectionSource::Idle,
        };
        prop_assert_eq!(queues.select(&NoClock).source, expected);
    }

    #[test]
    fn removal_keeps_survivor_order(
        owners in proptest::collection::vec(1u8..4, 0..=MAX_REGULAR_MESSAGES),
        victim in 1u8..4,
    ) {
        let mut queues = MessageQueues::new();
        for (i, owner) in owners.iter().enumerate() {
            queues.add_regular(entry(*owner, &format!("m{i}"))).unwrap();
        }

        let removed = queues.remove_regular(OwnerId(victim));

        let expected: Vec<String> = owners
            .iter()
            .enumerate()
            .filter(|(_, owner)| **owner != victim)
            .map(|(i, _)| format!("m{i}"))
            .collect();
        let remaining: Vec<String> = queues
            .regular()
            .iter()
            .map(|d| d.content.produce(&NoClock).as_str().to_string())
            .collect();

        prop_assert_eq!(removed, owners.len() - expected.len());
        prop_assert_eq!(remaining, expected);
    }

    #[test]
    fn slow_work_permitted_only_for_long_holds(period_ms in 1u32..5000) {
        let mut task = DisplayTask::new(NullRenderer, &NoClock);
        task.add_regular_message(MessageDescriptor::regular(
            OwnerId(1),
            Content::Static(text_from("x")),
            Duration::from_millis(period_ms),
            1,
            false,
        ))
        .unwrap();

        let mut gate = SlowTaskGate::new();
        for _ in 0..2 {
            let mut ctx = TickContext::new(Instant::ZERO, &mut gate);
            task.run(&mut ctx);
        }

        prop_assert_eq!(gate.is_permitted(), period_ms >= 1000);
    }
}
