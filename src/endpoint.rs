//! Static endpoint descriptors.
//!
//! Every remote endpoint is described by an [`Endpoint`]: the path segment
//! appended to the base URL, the [`Shape`] applied to a successful body and
//! the [`ErrorPolicy`] applied to non-200 responses.

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// How a successful (200) response body is turned into the returned value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Return the body unchanged.
    PassThrough,
    /// Keep `_id` (renamed to `id`) and `fact`.
    Fact,
    /// Keep `_id` (renamed to `id`), `quote`, `anime` and `author`.
    Quote,
}

impl Shape {
    /// Applies the shape to a parsed response body.
    ///
    /// Fields missing from the body come out as `null`; everything not
    /// listed by the shape is dropped.
    ///
    /// ```
    /// use serde_json::json;
    /// use waifu_api::Shape;
    ///
    /// let body = json!({ "_id": 7, "fact": "cats sleep a lot", "__v": 0 });
    /// assert_eq!(
    ///     Shape::Fact.apply(body),
    ///     json!({ "id": 7, "fact": "cats sleep a lot" })
    /// );
    /// ```
    pub fn apply(self, body: Value) -> Value {
        match self {
            Shape::PassThrough => body,
            Shape::Fact => pick(&body, &[("id", "_id"), ("fact", "fact")]),
            Shape::Quote => pick(
                &body,
                &[
                    ("id", "_id"),
                    ("quote", "quote"),
                    ("anime", "anime"),
                    ("author", "author"),
                ],
            ),
        }
    }
}

fn pick(body: &Value, fields: &[(&str, &str)]) -> Value {
    let mut out = Map::with_capacity(fields.len());
    for (to, from) in fields {
        let value = body.get(*from).cloned().unwrap_or(Value::Null);
        out.insert((*to).to_string(), value);
    }
    Value::Object(out)
}

/// What happens when the server answers with a status other than 200.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Return an [`Outcome::Failed`](crate::Outcome::Failed) describing the
    /// failure. Used by `fact`, `quote` and `waifu`.
    Describe,
    /// Return [`Error::Status`](crate::Error::Status). Used by every reaction
    /// endpoint.
    Raise,
}

/// A remote endpoint: path segment, success shape and error policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Path segment appended to the base URL.
    pub path: &'static str,
    /// Shape applied to a 200 body.
    pub shape: Shape,
    /// Handling of non-200 responses.
    pub policy: ErrorPolicy,
}

impl Endpoint {
    /// `GET /fact`
    pub const FACT: Endpoint = Endpoint {
        path: "fact",
        shape: Shape::Fact,
        policy: ErrorPolicy::Describe,
    };

    /// `GET /quote`
    pub const QUOTE: Endpoint = Endpoint {
        path: "quote",
        shape: Shape::Quote,
        policy: ErrorPolicy::Describe,
    };

    /// `GET /waifu`. Shares the describing error policy but passes the body through.
    pub const WAIFU: Endpoint = Endpoint {
        path: "waifu",
        shape: Shape::PassThrough,
        policy: ErrorPolicy::Describe,
    };

    /// Human-readable message for a non-200 status under [`ErrorPolicy::Describe`].
    ///
    /// ```
    /// use waifu_api::Endpoint;
    ///
    /// assert_eq!(Endpoint::FACT.failure_message(404), "Could not find any fact");
    /// assert_eq!(Endpoint::QUOTE.failure_message(502), "Server down");
    /// assert_eq!(Endpoint::WAIFU.failure_message(418), "Unknown error");
    /// ```
    pub fn failure_message(&self, status: u16) -> String {
        match status {
            404 => format!("Could not find any {}", self.path),
            502 => "Server down".to_string(),
            _ => "Unknown error".to_string(),
        }
    }
}

/// Error returned when parsing an unknown reaction name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown reaction: {0}")]
pub struct UnknownReaction(pub String);

macro_rules! reactions {
    ($($variant:ident => $method:ident, $path:literal;)+) => {
        /// The reaction-GIF endpoints.
        ///
        /// All of them pass the body through unchanged and use
        /// [`ErrorPolicy::Raise`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Reaction {
            $(
                #[doc = concat!("`GET /", $path, "`")]
                $variant,
            )+
        }

        impl Reaction {
            /// Every reaction, in path order.
            pub const ALL: &'static [Reaction] = &[$(Reaction::$variant),+];

            /// The path segment of this reaction.
            pub fn path(self) -> &'static str {
                match self {
                    $(Reaction::$variant => $path,)+
                }
            }
        }

        impl FromStr for Reaction {
            type Err = UnknownReaction;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($path => Ok(Reaction::$variant),)+
                    other => Err(UnknownReaction(other.to_string())),
                }
            }
        }

        impl crate::Client {
            $(
                #[doc = concat!("Fetches a random `", $path, "` reaction.")]
                ///
                /// Returns the response body unchanged. Non-200 responses fail
                /// with [`Error::Status`](crate::Error::Status).
                pub async fn $method(&self) -> crate::Result<Value> {
                    self.reaction(Reaction::$variant).await
                }
            )+
        }
    };
}

reactions! {
    Angry => get_angry, "angry";
    Baka => get_baka, "baka";
    Bite => get_bite, "bite";
    Blush => get_blush, "blush";
    Bonk => get_bonk, "bonk";
    Bored => get_bored, "bored";
    Bully => get_bully, "bully";
    Bye => get_bye, "bye";
    Chase => get_chase, "chase";
    Cheer => get_cheer, "cheer";
    Cringe => get_cringe, "cringe";
    Cry => get_cry, "cry";
    Cuddle => get_cuddle, "cuddle";
    Dab => get_dab, "dab";
    Dance => get_dance, "dance";
    Die => get_die, "die";
    Disgust => get_disgust, "disgust";
    Facepalm => get_facepalm, "facepalm";
    Feed => get_feed, "feed";
    Glomp => get_glomp, "glomp";
    Happy => get_happy, "happy";
    Hi => get_hi, "hi";
    Highfive => get_highfive, "highfive";
    Hug => get_hug, "hug";
    Kick => get_kick, "kick";
    Kill => get_kill, "kill";
    Kiss => get_kiss, "kiss";
    Laugh => get_laugh, "laugh";
    Lick => get_lick, "lick";
    Love => get_love, "love";
    Lurk => get_lurk, "lurk";
    Midfing => get_midfing, "midfing";
    Nervous => get_nervous, "nervous";
    Nom => get_nom, "nom";
    Nope => get_nope, "nope";
    Nuzzle => get_nuzzle, "nuzzle";
    Panic => get_panic, "panic";
    Pat => get_pat, "pat";
    Peck => get_peck, "peck";
    Poke => get_poke, "poke";
    Pout => get_pout, "pout";
    Punch => get_punch, "punch";
    Run => get_run, "run";
    Sad => get_sad, "sad";
    Shoot => get_shoot, "shoot";
    Shrug => get_shrug, "shrug";
    Sip => get_sip, "sip";
    Slap => get_slap, "slap";
    Sleepy => get_sleepy, "sleepy";
    Smile => get_smile, "smile";
    Smug => get_smug, "smug";
    Stab => get_stab, "stab";
    Stare => get_stare, "stare";
    Suicide => get_suicide, "suicide";
    Tease => get_tease, "tease";
    Think => get_think, "think";
    Thumbsup => get_thumbsup, "thumbsup";
    Tickle => get_tickle, "tickle";
    Triggered => get_triggered, "triggered";
    Wag => get_wag, "wag";
    Wave => get_wave, "wave";
    Wink => get_wink, "wink";
    Yes => get_yes, "yes";
}

impl Reaction {
    /// The endpoint descriptor for this reaction.
    pub fn endpoint(self) -> Endpoint {
        Endpoint {
            path: self.path(),
            shape: Shape::PassThrough,
            policy: ErrorPolicy::Raise,
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
