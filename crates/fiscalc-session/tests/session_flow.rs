//! End-to-end host loop: events in, snapshots out, write-backs echoed.

use fiscalc_core::EditDirection;
use fiscalc_session::{init_tracing, Session, SessionConfig, SessionEvent, Snapshot};

/// Plays the role of the page: applies write-backs to its fields and fires
/// the change event a real input would fire.
struct FakeHost {
    session: Session,
    base_field: String,
    total_field: String,
    renders: usize,
}

impl FakeHost {
    fn new(config: SessionConfig) -> Self {
        FakeHost {
            session: Session::new(config),
            base_field: String::new(),
            total_field: String::new(),
            renders: 0,
        }
    }

    fn send(&mut self, event: SessionEvent) -> Option<Snapshot> {
        let snapshot = self.session.handle(event)?;
        self.renders += 1;

        if let Some(write) = snapshot.write_back.clone() {
            match write.field {
                EditDirection::Base => {
                    self.base_field = write.text.clone();
                    assert!(self.session.handle(SessionEvent::EditBase(write.text)).is_none());
                }
                EditDirection::Total => {
                    self.total_field = write.text.clone();
                    assert!(self.session.handle(SessionEvent::EditTotal(write.text)).is_none());
                }
            }
        }
        Some(snapshot)
    }

    fn type_base(&mut self, text: &str) -> Snapshot {
        self.base_field = text.to_string();
        self.send(SessionEvent::EditBase(text.to_string())).unwrap()
    }

    fn type_total(&mut self, text: &str) -> Snapshot {
        self.total_field = text.to_string();
        self.send(SessionEvent::EditTotal(text.to_string())).unwrap()
    }
}

#[test]
fn invoice_with_vat_and_withholding() {
    init_tracing();
    let mut host = FakeHost::new(SessionConfig::default());

    host.send(SessionEvent::Refresh).unwrap();
    host.send(SessionEvent::ToggleSubtractive).unwrap();

    let snapshot = host.type_base("1.000");
    // "1.000" is one euro: the dot is a decimal point, not grouping.
    assert_eq!(snapshot.total, "1,06\u{a0}€");
    assert_eq!(host.total_field, "1.06");

    let snapshot = host.type_base("1000");
    assert_eq!(snapshot.additive, "210,00\u{a0}€");
    assert_eq!(snapshot.subtractive, "\u{2212} 150,00\u{a0}€");
    assert_eq!(snapshot.total, "1060,00\u{a0}€");
    assert_eq!(host.total_field, "1060.00");
    assert_eq!(host.session.input().last_edited, EditDirection::Base);
}

#[test]
fn typing_a_total_solves_the_base() {
    let mut host = FakeHost::new(SessionConfig::default());
    host.send(SessionEvent::ToggleSubtractive).unwrap();

    let snapshot = host.type_total("1060");
    assert_eq!(snapshot.base, "1000,00\u{a0}€");
    assert!(snapshot.exact);
    assert_eq!(host.base_field, "1000.00");
    assert_eq!(host.session.input().last_edited, EditDirection::Total);

    // Changing a rate keeps the total authoritative.
    let snapshot = host
        .send(SessionEvent::EditAdditiveRate("10".to_string()))
        .unwrap();
    assert_eq!(snapshot.total, "1060,00\u{a0}€");
    assert_eq!(snapshot.base, "1115,79\u{a0}€");
    assert_eq!(host.base_field, "1115.79");
}

#[test]
fn unreachable_total_is_reported_as_approximate() {
    let mut host = FakeHost::new(SessionConfig::default());

    let snapshot = host.type_total("0,03");
    assert!(!snapshot.exact);
    assert!(!snapshot.unresolved);
    assert_eq!(snapshot.base, "0,02\u{a0}€");
}

#[test]
fn degenerate_rates_render_placeholders_and_recover() {
    let mut host = FakeHost::new(SessionConfig::default());
    host.send(SessionEvent::ToggleAdditive).unwrap();
    host.send(SessionEvent::ToggleSubtractive).unwrap();
    host.send(SessionEvent::EditSubtractiveRate("100".to_string()))
        .unwrap();

    let snapshot = host.type_total("80");
    assert!(snapshot.unresolved);
    assert_eq!(snapshot.base, "—");
    assert!(snapshot.write_back.is_none());

    let snapshot = host
        .send(SessionEvent::EditSubtractiveRate("20".to_string()))
        .unwrap();
    assert!(!snapshot.unresolved);
    assert_eq!(snapshot.base, "100,00\u{a0}€");
    assert_eq!(host.base_field, "100.00");
}

#[test]
fn config_from_lookup_changes_defaults() {
    let config = SessionConfig::from_lookup(|key| match key {
        "FISCALC_VAT_PERCENT" => Some("10".to_string()),
        "FISCALC_WITHHOLDING_ENABLED" => Some("1".to_string()),
        "FISCALC_WITHHOLDING_PERCENT" => Some("7".to_string()),
        _ => None,
    });
    let mut host = FakeHost::new(config);

    let snapshot = host.type_base("100");
    assert!(snapshot.show_subtractive);
    assert_eq!(snapshot.total, "103,00\u{a0}€");
    assert_eq!(host.renders, 1);
}
