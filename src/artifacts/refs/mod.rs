pub mod reference;
pub mod revision;

pub const HEAD_REF_NAME: &str = "HEAD";
pub const HEADS_PREFIX: &str = "refs/heads/";
pub const TAGS_PREFIX: &str = "refs/tags/";

/// Symbolic hops followed before a chain is declared cyclic
pub const MAX_SYMREF_DEPTH: usize = 8;

pub const SYMREF_REGEX: &str = r"^ref: (.+)$";
pub const INVALID_REF_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";
pub const REF_ALIASES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "@" => "HEAD",
};
