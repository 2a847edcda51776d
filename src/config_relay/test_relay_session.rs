#![cfg(test)]

//! Full configuration-session scenarios against a recording host.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;

use crate::config_relay::{
    AppMessage, AppMessageKey, ConfigRelay, HostEvent, HostRuntime, SendCallbacks,
    CONFIG_PAGE_URL,
};

/// Host double that records everything the relay asks of it.
#[derive(Default)]
struct RecordingHost {
    opened_urls: Rc<RefCell<Vec<String>>>,
    sent_messages: Rc<RefCell<Vec<AppMessage>>>,
    fail_sends: bool,
}

impl RecordingHost {
    fn new(fail_sends: bool) -> Self {
        Self {
            fail_sends,
            ..Default::default()
        }
    }
}

impl HostRuntime for RecordingHost {
    fn open_url(&mut self, url: &str) -> anyhow::Result<()> {
        self.opened_urls.borrow_mut().push(url.to_string());
        Ok(())
    }

    fn send_app_message(&mut self, message: &AppMessage, callbacks: SendCallbacks) {
        self.sent_messages.borrow_mut().push(message.clone());

        if self.fail_sends {
            callbacks.failed(anyhow!("watch unreachable"));
        } else {
            callbacks.succeeded();
        }
    }
}

fn relay_with_recording_host() -> (
    ConfigRelay<RecordingHost>,
    Rc<RefCell<Vec<String>>>,
    Rc<RefCell<Vec<AppMessage>>>,
) {
    let host = RecordingHost::new(false);
    let opened_urls = host.opened_urls.clone();
    let sent_messages = host.sent_messages.clone();

    (ConfigRelay::new(host), opened_urls, sent_messages)
}

fn encode(payload_json: &str) -> String {
    // Minimal encodeURIComponent stand-in for the characters the settings
    // page payload actually contains.
    payload_json
        .replace('%', "%25")
        .replace('{', "%7B")
        .replace('}', "%7D")
        .replace('"', "%22")
        .replace(':', "%3A")
        .replace(',', "%2C")
}

#[test]
fn ready_event_touches_nothing() {
    let (mut relay, opened_urls, sent_messages) = relay_with_recording_host();

    relay.handle_event(HostEvent::Ready).unwrap();

    assert!(opened_urls.borrow().is_empty());
    assert!(sent_messages.borrow().is_empty());
}

#[test]
fn show_configuration_opens_the_settings_url_exactly_once() {
    let (mut relay, opened_urls, sent_messages) = relay_with_recording_host();

    relay.handle_event(HostEvent::ShowConfiguration).unwrap();

    assert_eq!(opened_urls.borrow().as_slice(), [CONFIG_PAGE_URL]);
    assert!(sent_messages.borrow().is_empty());
}

#[test]
fn every_show_configuration_event_opens_the_url_again() {
    let (mut relay, opened_urls, _) = relay_with_recording_host();

    relay.handle_event(HostEvent::ShowConfiguration).unwrap();
    relay.handle_event(HostEvent::ShowConfiguration).unwrap();

    assert_eq!(opened_urls.borrow().len(), 2);
}

#[test]
fn high_contrast_session_sends_only_the_flag() {
    let (mut relay, _, sent_messages) = relay_with_recording_host();

    let response = encode(r#"{"high_contrast":true,"background_color":"0x1A2B3C"}"#);
    relay
        .handle_event(HostEvent::WebviewClosed { response })
        .unwrap();

    let mut expected = AppMessage::new();
    expected.insert(AppMessageKey::HighContrast, 1);

    assert_eq!(sent_messages.borrow().as_slice(), [expected]);
}

#[test]
fn color_session_sends_the_three_channels() {
    let (mut relay, _, sent_messages) = relay_with_recording_host();

    let response = encode(r#"{"high_contrast":false,"background_color":"0x1A2B3C"}"#);
    relay
        .handle_event(HostEvent::WebviewClosed { response })
        .unwrap();

    let mut expected = AppMessage::new();
    expected.insert(AppMessageKey::ColorRedBg, 26);
    expected.insert(AppMessageKey::ColorGreenBg, 43);
    expected.insert(AppMessageKey::ColorBlueBg, 60);

    assert_eq!(sent_messages.borrow().as_slice(), [expected]);
}

#[test]
fn absent_high_contrast_behaves_like_false() {
    let (mut relay, _, sent_messages) = relay_with_recording_host();

    let response = encode(r#"{"background_color":"0xFF0000"}"#);
    relay
        .handle_event(HostEvent::WebviewClosed { response })
        .unwrap();

    let sent = sent_messages.borrow();
    assert_eq!(sent[0].get(AppMessageKey::ColorRedBg), Some(255));
    assert_eq!(sent[0].get(AppMessageKey::HighContrast), None);
}

#[test]
fn malformed_payload_fails_the_handler_and_sends_nothing() {
    let (mut relay, _, sent_messages) = relay_with_recording_host();

    let result = relay.handle_event(HostEvent::WebviewClosed {
        response: "%7Bnot-json".to_string(),
    });

    assert!(result.is_err());
    assert!(sent_messages.borrow().is_empty());
}

#[test]
fn malformed_color_fails_the_handler_and_sends_nothing() {
    let (mut relay, _, sent_messages) = relay_with_recording_host();

    let response = encode(r#"{"high_contrast":false,"background_color":"0x12"}"#);
    let result = relay.handle_event(HostEvent::WebviewClosed { response });

    assert!(result.is_err());
    assert!(sent_messages.borrow().is_empty());
}

#[test]
fn failing_host_still_completes_the_handler() {
    let host = RecordingHost::new(true);
    let sent_messages = host.sent_messages.clone();
    let mut relay = ConfigRelay::new(host);

    let response = encode(r#"{"high_contrast":true}"#);
    relay
        .handle_event(HostEvent::WebviewClosed { response })
        .unwrap();

    // The message was handed over; the failed delivery is logged, not
    // retried and not surfaced as a handler error.
    assert_eq!(sent_messages.borrow().len(), 1);
}

#[test]
fn whole_session_in_order() {
    let (mut relay, opened_urls, sent_messages) = relay_with_recording_host();

    let response = encode(r#"{"high_contrast":false,"background_color":"0x00FF7F"}"#);
    let events = vec![
        HostEvent::Ready,
        HostEvent::ShowConfiguration,
        HostEvent::WebviewClosed { response },
    ];

    for event in events {
        relay.handle_event(event).unwrap();
    }

    assert_eq!(opened_urls.borrow().len(), 1);
    assert_eq!(sent_messages.borrow().len(), 1);
    assert_eq!(
        sent_messages.borrow()[0].get(AppMessageKey::ColorGreenBg),
        Some(255)
    );
}
