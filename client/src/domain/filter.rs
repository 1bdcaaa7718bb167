//! Username search over a user collection.
//!
//! Matching is a case-insensitive substring test against the username only;
//! email is never consulted. A blank query matches every user.

use super::User;

/// Return the users whose username contains `query`, in collection order.
///
/// An empty or whitespace-only query returns the whole collection. Any other
/// query is matched as typed, surrounding whitespace included.
///
/// # Examples
/// ```
/// use client::domain::{filter_users, User, UserId};
///
/// let users = vec![
///     User::new(UserId::new(1), "Alice", "a@x.com"),
///     User::new(UserId::new(2), "bob", "b@x.com"),
/// ];
/// let view = filter_users(&users, "AL");
/// assert_eq!(view, vec![users[0].clone()]);
/// ```
pub fn filter_users(collection: &[User], query: &str) -> Vec<User> {
    if query.trim().is_empty() {
        return collection.to_vec();
    }
    let needle = query.to_lowercase();
    collection
        .iter()
        .filter(|user| user.username().to_lowercase().contains(needle.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use rstest::{fixture, rstest};

    #[fixture]
    fn collection() -> Vec<User> {
        vec![
            User::new(UserId::new(1), "Alice", "a@x.com"),
            User::new(UserId::new(2), "bob", "b@x.com"),
            User::new(UserId::new(3), "Malory", "alice@x.com"),
            User::new(UserId::new(4), "BOBBY", "bobby@x.com"),
        ]
    }

    fn ids(users: &[User]) -> Vec<u64> {
        users.iter().map(|user| user.id().get()).collect()
    }

    #[rstest]
    fn matches_username_case_insensitively(collection: Vec<User>) {
        assert_eq!(ids(&filter_users(&collection, "al")), vec![1, 3]);
        assert_eq!(ids(&filter_users(&collection, "BoB")), vec![2, 4]);
    }

    #[rstest]
    fn ignores_email_when_matching(collection: Vec<User>) {
        // "alice" only appears in Malory's email.
        assert_eq!(ids(&filter_users(&collection, "alice")), vec![1]);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_query_restores_full_collection(collection: Vec<User>, #[case] query: &str) {
        assert_eq!(filter_users(&collection, query), collection);
    }

    #[rstest]
    #[case("a")]
    #[case("ob")]
    #[case("y")]
    #[case("zzz")]
    fn result_is_ordered_subsequence(collection: Vec<User>, #[case] query: &str) {
        let view = filter_users(&collection, query);
        let mut remaining = collection.iter();
        for user in &view {
            assert!(
                remaining.any(|candidate| candidate == user),
                "filtered view must preserve collection order"
            );
        }
    }

    #[rstest]
    #[case("al")]
    #[case("bob")]
    #[case("o")]
    fn upper_case_query_gives_same_view(collection: Vec<User>, #[case] query: &str) {
        assert_eq!(
            filter_users(&collection, query),
            filter_users(&collection, &query.to_uppercase())
        );
    }

    #[rstest]
    #[case("al")]
    #[case("b")]
    #[case("")]
    fn filtering_is_idempotent(collection: Vec<User>, #[case] query: &str) {
        let once = filter_users(&collection, query);
        let twice = filter_users(&once, query);
        assert_eq!(once, twice);
        assert_eq!(once, filter_users(&collection, query));
    }

    #[rstest]
    #[case(" al")]
    #[case("al ")]
    #[case("  bob  ")]
    fn padded_query_is_matched_as_typed(collection: Vec<User>, #[case] query: &str) {
        assert!(filter_users(&collection, query).is_empty());
    }

    #[rstest]
    fn inner_whitespace_is_part_of_the_needle() {
        let users = vec![
            User::new(UserId::new(1), "Alice", "a@x.com"),
            User::new(UserId::new(2), "al bundy", "b@x.com"),
        ];
        assert_eq!(ids(&filter_users(&users, " bun")), vec![2]);
        assert!(filter_users(&users, " al").is_empty());
    }

    #[rstest]
    fn empty_collection_yields_empty_view() {
        assert!(filter_users(&[], "al").is_empty());
        assert!(filter_users(&[], "").is_empty());
    }
}
