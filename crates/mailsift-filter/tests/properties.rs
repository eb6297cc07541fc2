//! Property tests for combinators and ranking.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use mailsift_core::{Attachment, Directory, Identity, Mail, MailId, TextMatchMode, UserId};
use mailsift_filter::strategy::{
    AfterDateFilter, AttachmentFilter, BeforeDateFilter, BodyFilter, ExactDateFilter,
    FolderFilter, HasAttachmentsFilter, IsReadFilter, PriorityFilter, ReceiverFilter,
    SenderFilter, SubjectFilter,
};
use mailsift_filter::{And, BoxedStrategy, FilterStrategy, Or, Ranker, Score};
use proptest::prelude::*;

const WORDS: &[&str] = &["budget", "lunch", "project", "invoice", "report", "meeting"];
const FOLDERS: &[&str] = &["inbox", "sent", "draft", "trash"];
const ADDRESSES: &[&str] = &[
    "john.doe@example.com",
    "alice@example.com",
    "bjones@corp.example",
];
const PEOPLE: &[&str] = &["alice", "bob", "john doe", "smith", "carol"];
const LEAF_KINDS: usize = 12;

fn directory() -> Arc<Directory> {
    Arc::new(
        [
            Identity::new(UserId(1), "John", "Doe", "john.doe@example.com"),
            Identity::new(UserId(2), "Alice", "Smith", "alice@example.com"),
            Identity::new(UserId(3), "Bob", "Jones", "bjones@corp.example"),
        ]
        .into_iter()
        .collect(),
    )
}

/// February 2024 at 08:00, the hour every generated mail is stamped with.
fn february(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, day, 8, 0, 0).unwrap()
}

fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 0..4).prop_map(|words| words.join(" "))
}

prop_compose! {
    fn arb_mail(id: i64)(
        priority in 0..8i32,
        is_read in any::<bool>(),
        folder in prop::sample::select(FOLDERS),
        subject in arb_text(),
        body in arb_text(),
        attachment in prop::option::of(prop::sample::select(WORDS)),
        day in 1..28u32,
        sender in prop::sample::select(ADDRESSES),
        receivers in prop::sample::subsequence(ADDRESSES, 0..=3),
    ) -> Mail {
        let mut mail = Mail::new(MailId(id), UserId(1), sender, subject, february(day))
            .with_body(body)
            .with_priority(priority)
            .with_folder(folder)
            .with_read(is_read);
        if let Some(name) = attachment {
            mail = mail.with_attachment(Attachment::new(format!("{name}.pdf"), "application/pdf"));
        }
        for receiver in receivers {
            mail = mail.with_receiver(receiver);
        }
        mail
    }
}

fn arb_mails() -> impl Strategy<Value = Vec<Mail>> {
    (0..20usize).prop_flat_map(|n| {
        (0..n)
            .map(|i| arb_mail(i64::try_from(i).unwrap()))
            .collect::<Vec<_>>()
    })
}

/// One leaf strategy chosen by index, so pairs of them can be combined.
///
/// `priority` also picks the person searched for and the target day.
fn leaf(kind: usize, word: &str, priority: i32, flag: bool) -> BoxedStrategy {
    let index = usize::try_from(priority).unwrap();
    let person = PEOPLE[index % PEOPLE.len()];
    let day = february(u32::try_from(priority * 3 + 1).unwrap());
    match kind % LEAF_KINDS {
        0 => Box::new(PriorityFilter::new(priority)),
        1 => Box::new(IsReadFilter::new(flag)),
        2 => Box::new(SubjectFilter::new(word, TextMatchMode::Substring)),
        3 => Box::new(BodyFilter::new(word, TextMatchMode::WordPrefix)),
        4 => Box::new(HasAttachmentsFilter::new(flag)),
        5 => Box::new(AttachmentFilter::new(word)),
        6 => Box::new(SenderFilter::new([person], directory())),
        7 => Box::new(ReceiverFilter::new([person], directory())),
        8 => Box::new(ExactDateFilter::new(day)),
        9 => Box::new(BeforeDateFilter::new(day).with_window_days(30)),
        10 => Box::new(AfterDateFilter::new(day)),
        _ => Box::new(FolderFilter::new(if flag { "inbox" } else { "sent" })),
    }
}

/// Parameters of a generated leaf strategy.
#[derive(Debug, Clone)]
struct LeafSpec {
    kind: usize,
    word: &'static str,
    priority: i32,
    flag: bool,
}

impl LeafSpec {
    fn build(&self) -> BoxedStrategy {
        leaf(self.kind, self.word, self.priority, self.flag)
    }
}

prop_compose! {
    fn arb_leaf()(
        kind in 0..LEAF_KINDS,
        word in prop::sample::select(WORDS),
        priority in 0..8i32,
        flag in any::<bool>(),
    ) -> LeafSpec {
        LeafSpec { kind, word, priority, flag }
    }
}

proptest! {
    #[test]
    fn and_matches_is_conjunction(
        mail in arb_mail(1),
        left_kind in 0..LEAF_KINDS,
        right_kind in 0..LEAF_KINDS,
        word in prop::sample::select(WORDS),
        priority in 0..8i32,
        flag in any::<bool>(),
    ) {
        let left = leaf(left_kind, word, priority, flag);
        let right = leaf(right_kind, word, priority, !flag);
        let expected = left.matches(&mail).unwrap() && right.matches(&mail).unwrap();

        let and = And::new(left, right);
        prop_assert_eq!(and.matches(&mail).unwrap(), expected);
    }

    #[test]
    fn or_matches_is_disjunction(
        mail in arb_mail(1),
        left_kind in 0..LEAF_KINDS,
        right_kind in 0..LEAF_KINDS,
        word in prop::sample::select(WORDS),
        priority in 0..8i32,
        flag in any::<bool>(),
    ) {
        let left = leaf(left_kind, word, priority, flag);
        let right = leaf(right_kind, word, priority, !flag);
        let expected = left.matches(&mail).unwrap() || right.matches(&mail).unwrap();

        let or = Or::new(left, right);
        prop_assert_eq!(or.matches(&mail).unwrap(), expected);
    }

    #[test]
    fn matching_scores_stay_in_range(mail in arb_mail(1), spec in arb_leaf()) {
        let strategy = spec.build();
        if strategy.matches(&mail).unwrap() {
            prop_assert!(strategy.score(&mail).unwrap().value() <= 100);
        }
    }

    #[test]
    fn soft_and_is_monotone(a in 0..=100i64, b in 0..=100i64, c in 0..=100i64) {
        let (lo, hi) = if b <= c { (b, c) } else { (c, b) };
        let a = Score::new(a);
        prop_assert!(a.soft_and(Score::new(lo)) <= a.soft_and(Score::new(hi)));
        prop_assert!(Score::new(lo).soft_and(a) <= Score::new(hi).soft_and(a));
    }

    #[test]
    fn soft_and_with_zero_is_zero(a in 0..=100i64) {
        prop_assert_eq!(Score::new(a).soft_and(Score::ZERO), Score::ZERO);
        prop_assert_eq!(Score::ZERO.soft_and(Score::new(a)), Score::ZERO);
    }

    #[test]
    fn soft_or_dominates_both_sides(a in 0..=100i64, b in 0..=100i64) {
        let (a, b) = (Score::new(a), Score::new(b));
        let combined = a.soft_or(b);
        prop_assert!(combined >= a.max(b));
        prop_assert!(combined <= Score::MAX);
    }

    #[test]
    fn ranking_is_ordered_subset(mails in arb_mails(), left in arb_leaf(), right in arb_leaf()) {
        let strategy = Or::new(left.build(), right.build());
        let ranked = Ranker::default().rank_scored(&strategy, mails.clone()).unwrap();

        prop_assert!(ranked.len() <= mails.len());
        let mut seen = std::collections::HashSet::new();
        for scored in &ranked {
            prop_assert!(mails.contains(&scored.mail));
            prop_assert!(seen.insert(scored.mail.id));
            prop_assert!(strategy.matches(&scored.mail).unwrap());
        }
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }
}
