use crate::profile::UserProfile;

/// Profiles matching `term` (case-insensitive) in username or any name field.
pub fn filter_profiles(profiles: &[UserProfile], term: &str) -> Vec<UserProfile> {
    let q = term.trim().to_lowercase();
    if q.is_empty() {
        return profiles.to_vec();
    }
    profiles
        .iter()
        .filter(|p| {
            p.username.to_lowercase().contains(&q)
                || p.first_name.to_lowercase().contains(&q)
                || p.last_name.to_lowercase().contains(&q)
                || p.nickname.to_lowercase().contains(&q)
                || p.full_name().to_lowercase().contains(&q)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn mk(id: &str, username: &str, first: &str, last: &str, nick: &str) -> UserProfile {
		UserProfile::new(id, username).with_name(first, last).with_nickname(nick)
	}

	#[test]
	fn search_matches_multiple_fields() {
		let profiles = vec![
			mk("1", "alice", "Alice", "Anders", ""),
			mk("2", "bob", "Bobby", "Tables", "drop"),
		];
		let hits = filter_profiles(&profiles, "bOb");
		assert_eq!(hits.len(), 1);
		assert_eq!(hits[0].username, "bob");

		assert_eq!(filter_profiles(&profiles, "DROP")[0].id, "2");
		assert_eq!(filter_profiles(&profiles, "alice anders")[0].id, "1");
		assert!(filter_profiles(&profiles, "carol").is_empty());
	}

	#[test]
	fn blank_term_keeps_everything_in_order() {
		let profiles = vec![mk("2", "zed", "", "", ""), mk("1", "amy", "", "", "")];
		let all = filter_profiles(&profiles, "   ");
		assert_eq!(all, profiles);
	}
}
