//! Integration property tests for request-gate.
//!
//! These tests validate the identity and fail-open invariants across
//! arbitrary header values and decisions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use request_gate::web::{RequestAdapter, RequestPipeline};
use request_gate::{
    BlockDecision, BlockKind, BlockTrigger, CallerIdentity, HttpResponse, IdentityResolver,
    IdentitySource, PolicyDecisionClient, SecurityContext, FIXED_NAMES,
};

struct Engine {
    available: bool,
    decision: Option<BlockDecision>,
    registrations: Mutex<usize>,
}

impl PolicyDecisionClient for Engine {
    fn is_available(&self) -> bool {
        self.available
    }

    fn register_identity(&self, _identity: &CallerIdentity) {
        *self.registrations.lock().unwrap() += 1;
    }

    fn evaluate_request(&self, _ctx: &SecurityContext) -> Option<BlockDecision> {
        self.decision.clone()
    }
}

// Strategy: Generate arbitrary blocking decision
fn arb_decision() -> impl Strategy<Value = BlockDecision> {
    (
        any::<bool>(),
        prop_oneof![
            Just(BlockKind::Blocked),
            Just(BlockKind::RateLimited),
            Just(BlockKind::Other),
        ],
        prop_oneof![
            Just(BlockTrigger::User),
            Just(BlockTrigger::Ip),
            Just(BlockTrigger::Unknown),
        ],
        prop::option::of(prop::string::string_regex("[0-9]{1,3}(\\.[0-9]{1,3}){3}").unwrap()),
        prop::option::of(prop::string::string_regex("[a-z ]{1,20}").unwrap()),
    )
        .prop_map(|(should_block, kind, trigger, ip, description)| BlockDecision {
            should_block,
            kind,
            trigger,
            ip,
            description,
        })
}

fn user_request(value: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert("user".to_string(), value.to_string());
    headers
}

proptest! {
    /// Property: the fixed name index is |n| mod 8 for every integer id
    #[test]
    fn proptest_user_header_name_index(n in any::<i64>()) {
        let identity = IdentityResolver::default()
            .resolve(&user_request(&n.to_string()))
            .expect("numeric user header resolves");

        let expected = FIXED_NAMES[(n.unsigned_abs() % 8) as usize];
        prop_assert_eq!(identity.id, n);
        prop_assert_eq!(identity.name.as_str(), expected);
        prop_assert_eq!(identity.source, IdentitySource::UserHeader);
    }

    /// Property: exponent notation scales the mantissa before truncation
    #[test]
    fn proptest_exponent_user_header_scales(mantissa in 0i64..100_000, exp in 0u32..8) {
        let identity = IdentityResolver::default()
            .resolve(&user_request(&format!("{}e{}", mantissa, exp)))
            .expect("numeric user header resolves");

        prop_assert_eq!(identity.id, mantissa * 10i64.pow(exp));
    }

    /// Property: the header pair yields (parse(id), name) verbatim
    #[test]
    fn proptest_header_pair_is_verbatim(
        id in any::<i32>(),
        name in "[^\\x00]{1,40}"
    ) {
        let mut headers = HashMap::new();
        headers.insert("X-User-ID".to_string(), id.to_string());
        headers.insert("X-User-Name".to_string(), name.clone());

        let identity = IdentityResolver::default()
            .resolve(&headers)
            .expect("both headers present");

        prop_assert_eq!(identity.id, i64::from(id));
        prop_assert_eq!(identity.name, name);
        prop_assert_eq!(identity.source, IdentitySource::HeaderPair);
    }

    /// Property: resolution is a pure function of the headers
    #[test]
    fn proptest_resolution_is_idempotent(value in "\\PC{0,24}") {
        let resolver = IdentityResolver::default();
        let headers = user_request(&value);

        prop_assert_eq!(resolver.resolve(&headers), resolver.resolve(&headers));
    }

    /// Property: an unavailable engine never blocks and never receives registrations
    #[test]
    fn proptest_unavailable_engine_fails_open(
        decision in arb_decision(),
        user in prop::option::of(any::<i64>())
    ) {
        let engine = Arc::new(Engine {
            available: false,
            decision: Some(decision),
            registrations: Mutex::new(0),
        });
        let pipeline = RequestPipeline::new(engine.clone());

        let mut request = RequestAdapter::new("req-prop".to_string());
        if let Some(user) = user {
            request.add_header("user".to_string(), user.to_string());
        }

        let response = pipeline.handle(&request, |_, _| HttpResponse::ok("handler"));

        prop_assert_eq!(response.body.as_str(), "handler");
        prop_assert_eq!(*engine.registrations.lock().unwrap(), 0);
    }

    /// Property: a blocking decision always short-circuits with 403 or 429
    #[test]
    fn proptest_blocking_decision_is_never_dropped(decision in arb_decision()) {
        let should_block = decision.should_block;
        let engine = Arc::new(Engine {
            available: true,
            decision: Some(decision),
            registrations: Mutex::new(0),
        });
        let pipeline = RequestPipeline::new(engine);

        let response = pipeline.handle(
            &RequestAdapter::new("req-block".to_string()),
            |_, _| HttpResponse::ok("handler"),
        );

        if should_block {
            prop_assert!(response.status == 403 || response.status == 429);
            prop_assert_ne!(response.body.as_str(), "handler");
        } else {
            prop_assert_eq!(response, HttpResponse::ok("handler"));
        }
    }
}
