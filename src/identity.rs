//! Caller identity derivation from inbound request headers.
//!
//! Two header sources can identify a caller:
//! - a single `user` header carrying a numeric id, whose display name is
//!   picked from [`FIXED_NAMES`]
//! - the pair `X-User-ID` + `X-User-Name`, where the name is taken verbatim
//!
//! The single-header source wins whenever it is present. Resolution never
//! fails; malformed or missing headers simply produce no identity.

use crate::client::PolicyDecisionClient;
use crate::config::IdentityConfig;
use crate::context::SecurityContext;
use crate::logging::RequestLog;
use crate::web::HeaderSource;

/// Display names handed out to callers identified by the `user` header.
///
/// The name for id `n` is `FIXED_NAMES[|n| % 8]`.
pub const FIXED_NAMES: [&str; 8] = [
    "Hans", "Pablo", "Samuel", "Timo", "Tudor", "Willem", "Wout", "Yannis",
];

/// Where a [`CallerIdentity`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// Numeric `user` header; the name was chosen from [`FIXED_NAMES`].
    UserHeader,
    /// `X-User-ID` / `X-User-Name` pair; the name is caller-controlled.
    HeaderPair,
}

/// A caller identity derived for the duration of a single request.
///
/// Never persisted. When `source` is [`IdentitySource::HeaderPair`] the name
/// is raw header text and must be treated as untrusted by anything that
/// renders or stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Numeric caller id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Header source the identity was derived from
    pub source: IdentitySource,
}

impl CallerIdentity {
    /// Returns true if the name was supplied verbatim by the caller.
    pub fn name_is_untrusted(&self) -> bool {
        self.source == IdentitySource::HeaderPair
    }
}

/// Returns the fixed display name for a numeric caller id.
///
/// ```
/// use request_gate::name_for_id;
///
/// assert_eq!(name_for_id(0), "Hans");
/// assert_eq!(name_for_id(9), "Pablo");
/// assert_eq!(name_for_id(-9), "Pablo");
/// ```
pub fn name_for_id(id: i64) -> &'static str {
    // unsigned_abs keeps i64::MIN in range
    let index = (id.unsigned_abs() % FIXED_NAMES.len() as u64) as usize;
    FIXED_NAMES[index]
}

/// Parses the leading number of `raw` and truncates it to an integer.
///
/// Leading whitespace is skipped and an optional sign is honoured. A plain
/// digit run is read exactly. A fraction or exponent (`1.5`, `1e3`,
/// `1.5e1`) makes the prefix a float, which is truncated toward zero.
/// Anything after the numeric prefix is ignored. Input without a numeric
/// prefix yields 0; out-of-range values saturate.
///
/// ```
/// use request_gate::parse_leading_int;
///
/// assert_eq!(parse_leading_int("42"), 42);
/// assert_eq!(parse_leading_int("  -7abc"), -7);
/// assert_eq!(parse_leading_int("abc"), 0);
/// assert_eq!(parse_leading_int("1e3"), 1000);
/// assert_eq!(parse_leading_int("1.5e1"), 15);
/// assert_eq!(parse_leading_int("99999999999999999999"), i64::MAX);
/// ```
pub fn parse_leading_int(raw: &str) -> i64 {
    let trimmed =
        raw.trim_start_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c'));
    let bytes = trimmed.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end += 1;
    }
    let int_start = end;
    end += digit_run(&bytes[end..]);
    let int_digits = end - int_start;

    let mut is_float = false;
    if bytes.get(end) == Some(&b'.') {
        let frac_digits = digit_run(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
            is_float = true;
        }
    }
    if int_digits == 0 && !is_float {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-' | b'+')) {
            exp_end += 1;
        }
        let exp_digits = digit_run(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
            is_float = true;
        }
    }

    let number = &trimmed[..end];
    if is_float {
        // `as` truncates toward zero and saturates at the i64 bounds
        return number.parse::<f64>().map_or(0, |value| value as i64);
    }

    let negative = bytes[0] == b'-';
    let mut value: i64 = 0;
    for byte in number[int_start..].bytes() {
        let digit = i64::from(byte - b'0');
        let next = value
            .checked_mul(10)
            .and_then(|v| if negative { v.checked_sub(digit) } else { v.checked_add(digit) });
        match next {
            Some(v) => value = v,
            None => return if negative { i64::MIN } else { i64::MAX },
        }
    }
    value
}

fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

/// Derives a [`CallerIdentity`] from request headers.
///
/// # Examples
///
/// ```
/// use request_gate::{IdentityResolver, IdentitySource};
/// use request_gate::web::RequestAdapter;
///
/// let mut adapter = RequestAdapter::new("req-1".to_string());
/// adapter.add_header("user".to_string(), "3".to_string());
///
/// let identity = IdentityResolver::default().resolve(&adapter).expect("user header set");
/// assert_eq!(identity.id, 3);
/// assert_eq!(identity.name, "Timo");
/// assert_eq!(identity.source, IdentitySource::UserHeader);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    headers: IdentityConfig,
}

impl IdentityResolver {
    /// Creates a resolver reading the header names from `config`.
    pub fn new(config: IdentityConfig) -> Self {
        Self { headers: config }
    }

    /// Resolves the caller identity. Pure function of the headers.
    pub fn resolve<H: HeaderSource + ?Sized>(&self, request: &H) -> Option<CallerIdentity> {
        if let Some(user) = present(request, &self.headers.user_header) {
            let id = parse_leading_int(user);
            return Some(CallerIdentity {
                id,
                name: name_for_id(id).to_string(),
                source: IdentitySource::UserHeader,
            });
        }

        let id = present(request, &self.headers.id_header)?;
        let name = present(request, &self.headers.name_header)?;

        Some(CallerIdentity {
            id: parse_leading_int(id),
            name: name.to_string(),
            source: IdentitySource::HeaderPair,
        })
    }

    /// Resolves the caller identity and registers it with `ctx` and `client`.
    ///
    /// Registration with the collaborator is skipped when it reports itself
    /// unavailable. Nothing is registered when no identity resolves.
    pub fn resolve_and_register<H: HeaderSource + ?Sized>(
        &self,
        request: &H,
        ctx: &mut SecurityContext,
        client: &dyn PolicyDecisionClient,
    ) -> Option<CallerIdentity> {
        let log = RequestLog::new(ctx.request_id());
        let Some(identity) = self.resolve(request) else {
            log.debug(format_args!("no caller identity headers"));
            return None;
        };

        log.debug(format_args!(
            "resolved caller id={} source={:?}",
            identity.id, identity.source
        ));
        ctx.register_identity(identity.clone(), client);
        Some(identity)
    }
}

fn present<'a, H: HeaderSource + ?Sized>(request: &'a H, name: &str) -> Option<&'a str> {
    request.header(name).filter(|value| !value.is_empty())
}
