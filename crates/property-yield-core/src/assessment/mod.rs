pub mod decision;
pub mod traffic_light;

pub use decision::{
    compute_break_even, decision_summary, interest_headroom, rent_gap, BreakEvenSummary,
    InterestHeadroom, RentGap,
};
pub use traffic_light::{assess, TrafficLight};
