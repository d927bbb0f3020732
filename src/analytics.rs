//! Analytics events
//!
//! The engine emits named events with small payloads into an injected sink.
//! Transport is the sink's business; a failing sink drops the event.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::sim::GameEvent;

/// Navigation timing milestones in ms, rounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NavigationTiming {
    pub dom_complete: u32,
    pub dom_interactive: u32,
    pub first_paint: u32,
    pub first_contentful_paint: u32,
}

/// Every event the page reports
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    TargetSpawn { index: u32 },
    BossSpawn { index: u32, hp: u32 },
    TargetHit { kills: u32 },
    BossHit { hp: u32, max_hp: u32 },
    BossDestroyed { kills: u32 },
    GoalReached { kills: u32, goal: u32 },
    ShootingStart,
    ShootingEnd,
    SocialClick { network: String, href: String },
    FirstView { path: String },
    RouteChange { from: String, to: String },
    PageView { path: String },
    PerfNavigation(NavigationTiming),
}

impl AnalyticsEvent {
    /// Event name as reported
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsEvent::TargetSpawn { .. } => "target_spawn",
            AnalyticsEvent::BossSpawn { .. } => "boss_spawn",
            AnalyticsEvent::TargetHit { .. } => "target_hit",
            AnalyticsEvent::BossHit { .. } => "boss_hit",
            AnalyticsEvent::BossDestroyed { .. } => "boss_destroyed",
            AnalyticsEvent::GoalReached { .. } => "goal_reached",
            AnalyticsEvent::ShootingStart => "shooting_start",
            AnalyticsEvent::ShootingEnd => "shooting_end",
            AnalyticsEvent::SocialClick { .. } => "social_click",
            AnalyticsEvent::FirstView { .. } => "first_view",
            AnalyticsEvent::RouteChange { .. } => "route_change",
            AnalyticsEvent::PageView { .. } => "page_view",
            AnalyticsEvent::PerfNavigation(_) => "perf_navigation",
        }
    }

    /// Serialized payload, `None` if serialization failed
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }
}

impl From<GameEvent> for AnalyticsEvent {
    fn from(event: GameEvent) -> Self {
        match event {
            GameEvent::TargetSpawned { spawn_index } => {
                AnalyticsEvent::TargetSpawn { index: spawn_index }
            }
            GameEvent::BossSpawned { spawn_index, hp } => AnalyticsEvent::BossSpawn {
                index: spawn_index,
                hp,
            },
            GameEvent::TargetDestroyed { kills } => AnalyticsEvent::TargetHit { kills },
            GameEvent::BossHit { hp, max_hp } => AnalyticsEvent::BossHit { hp, max_hp },
            GameEvent::BossDestroyed { kills } => AnalyticsEvent::BossDestroyed { kills },
        }
    }
}

/// Outbound profile link clicked
pub fn social_click(network: &str, href: &str) -> AnalyticsEvent {
    AnalyticsEvent::SocialClick {
        network: network.to_string(),
        href: href.to_string(),
    }
}

/// Fire-and-forget event sink
pub trait AnalyticsSink {
    fn notify(&mut self, event: &AnalyticsEvent);
}

impl<S: AnalyticsSink> AnalyticsSink for Rc<RefCell<S>> {
    fn notify(&mut self, event: &AnalyticsEvent) {
        self.borrow_mut().notify(event);
    }
}

/// Collects events in memory
impl AnalyticsSink for Vec<AnalyticsEvent> {
    fn notify(&mut self, event: &AnalyticsEvent) {
        self.push(event.clone());
    }
}

/// Drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AnalyticsSink for NullSink {
    fn notify(&mut self, _event: &AnalyticsEvent) {}
}

/// Writes each event to the log at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AnalyticsSink for LogSink {
    fn notify(&mut self, event: &AnalyticsEvent) {
        log::debug!(
            "analytics {}: {}",
            event.name(),
            event.to_json().unwrap_or_default()
        );
    }
}

/// Page view bookkeeping
///
/// Every observed path produces `page_view`. The first path also produces
/// `first_view`; later paths that differ from the previous one produce
/// `route_change`. Observing the same path twice in a row produces nothing.
#[derive(Debug, Default, Clone)]
pub struct PageTracker {
    current: Option<String>,
}

impl PageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Events for arriving at `path`
    pub fn observe(&mut self, path: &str) -> Vec<AnalyticsEvent> {
        let mut events = Vec::with_capacity(2);
        match self.current.as_deref() {
            Some(prev) if prev == path => return events,
            Some(prev) => events.push(AnalyticsEvent::RouteChange {
                from: prev.to_string(),
                to: path.to_string(),
            }),
            None => events.push(AnalyticsEvent::FirstView {
                path: path.to_string(),
            }),
        }
        events.push(AnalyticsEvent::PageView {
            path: path.to_string(),
        });
        self.current = Some(path.to_string());
        events
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{BeaconSink, navigation_timing};

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsCast;
    use web_sys::{PerformanceEntry, PerformanceNavigationTiming};

    use super::{AnalyticsEvent, AnalyticsSink, NavigationTiming};

    /// Posts each event as JSON via `navigator.sendBeacon`
    pub struct BeaconSink {
        endpoint: String,
    }

    impl BeaconSink {
        pub fn new(endpoint: impl Into<String>) -> Self {
            Self {
                endpoint: endpoint.into(),
            }
        }
    }

    impl AnalyticsSink for BeaconSink {
        fn notify(&mut self, event: &AnalyticsEvent) {
            let Some(payload) = event.to_json() else {
                return;
            };
            let Some(window) = web_sys::window() else {
                return;
            };
            match window
                .navigator()
                .send_beacon_with_opt_str(&self.endpoint, Some(&payload))
            {
                Ok(true) => {}
                Ok(false) => log::debug!("Beacon for {} not queued", event.name()),
                Err(_) => log::debug!("sendBeacon unsupported, dropped {}", event.name()),
            }
        }
    }

    /// Read navigation and paint timings; `None` before the page has loaded
    pub fn navigation_timing() -> Option<NavigationTiming> {
        let performance = web_sys::window()?.performance()?;

        let nav = performance.get_entries_by_type("navigation").get(0);
        let nav: PerformanceNavigationTiming = nav.dyn_into().ok()?;
        if nav.dom_complete() <= 0.0 {
            return None;
        }

        let mut timing = NavigationTiming {
            dom_complete: nav.dom_complete().round() as u32,
            dom_interactive: nav.dom_interactive().round() as u32,
            ..NavigationTiming::default()
        };

        for entry in performance.get_entries_by_type("paint").iter() {
            let Ok(entry) = entry.dyn_into::<PerformanceEntry>() else {
                continue;
            };
            let at = entry.start_time().round() as u32;
            match entry.name().as_str() {
                "first-paint" => timing.first_paint = at,
                "first-contentful-paint" => timing.first_contentful_paint = at,
                _ => {}
            }
        }

        Some(timing)
    }
}
