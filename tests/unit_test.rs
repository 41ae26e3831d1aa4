// Unit tests for roster
// These tests work with the public API only

#[cfg(test)]
mod sectioner_tests {
    use roster::{ChannelMember, RoleLabels, Section, SectionError, UserProfile, section_profiles};

    fn p(id: &str, username: &str) -> UserProfile {
        UserProfile::new(id, username)
    }

    fn ids(section: &Section) -> Vec<String> {
        section.data.iter().map(|m| m.profile.id.clone()).collect()
    }

    #[test]
    fn example_alphabetical_single_group() {
        let profiles = vec![p("a", "bob"), p("b", "Bea")];
        let sections = section_profiles(&profiles, None, &RoleLabels::default()).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].id, "B");
        assert!(sections[0].first);
        assert_eq!(ids(&sections[0]), vec!["a", "b"]);
    }

    #[test]
    fn example_role_groups() {
        let profiles = vec![p("a", "amy"), p("b", "bob")];
        let members = vec![ChannelMember::new("a", true), ChannelMember::new("b", false)];
        let sections = section_profiles(&profiles, Some(members.as_slice()), &RoleLabels::default()).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!((sections[0].id.as_str(), sections[0].first), ("Admins", true));
        assert_eq!(ids(&sections[0]), vec!["a"]);
        assert_eq!((sections[1].id.as_str(), sections[1].first), ("Members", false));
        assert_eq!(ids(&sections[1]), vec!["b"]);
    }

    #[test]
    fn example_empty_profiles() {
        let members = vec![ChannelMember::new("a", true)];
        assert!(section_profiles(&[], Some(members.as_slice()), &RoleLabels::default()).unwrap().is_empty());
    }

    #[test]
    fn every_profile_lands_in_exactly_one_section() {
        let names = ["mia", "Max", "abe", "zed", "Zoe", "ann", "moe", "ike"];
        let profiles: Vec<UserProfile> =
            names.iter().enumerate().map(|(i, n)| p(&i.to_string(), n)).collect();
        let sections = section_profiles(&profiles, None, &RoleLabels::default()).unwrap();

        let mut seen: Vec<String> = sections.iter().flat_map(ids).collect();
        seen.sort();
        let mut expected: Vec<String> = profiles.iter().map(|p| p.id.clone()).collect();
        expected.sort();
        assert_eq!(seen, expected);

        assert_eq!(sections.iter().filter(|s| s.first).count(), 1);
        assert!(sections[0].first);
        let keys: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(keys, vec!["M", "A", "Z", "I"]);
        // encounter order inside a group
        assert_eq!(ids(&sections[0]), vec!["0", "1", "6"]);
    }

    #[test]
    fn role_groups_keep_encounter_order() {
        let profiles = vec![p("3", "zed"), p("1", "amy"), p("2", "bob"), p("4", "cat")];
        let members = vec![
            ChannelMember::new("1", true),
            ChannelMember::new("2", false),
            ChannelMember::new("3", true),
            ChannelMember::new("4", false),
            ChannelMember::new("99", true),
        ];
        let sections = section_profiles(&profiles, Some(members.as_slice()), &RoleLabels::default()).unwrap();
        assert_eq!(ids(&sections[0]), vec!["3", "1"]);
        assert_eq!(ids(&sections[1]), vec!["2", "4"]);
        assert!(sections[0].data.iter().all(|m| m.is_channel_admin()));
    }

    #[test]
    fn contract_violations_are_typed_errors() {
        let profiles = vec![p("a", "amy")];
        let members = vec![ChannelMember::new("b", true)];
        assert!(matches!(
            section_profiles(&profiles, Some(members.as_slice()), &RoleLabels::default()),
            Err(SectionError::MissingMembership { .. })
        ));
        assert!(matches!(
            section_profiles(&[p("a", "")], None, &RoleLabels::default()),
            Err(SectionError::MalformedUsername { .. })
        ));
    }
}

#[cfg(test)]
mod list_tests {
    use roster::list::{ListData, ListEvent, MAX_USERS_IN_GM, SelectionChange, UserList, UserListHandler};
    use roster::{ChannelMember, UserProfile};

    #[derive(Default)]
    struct Calls(Vec<String>);

    impl UserListHandler for Calls {
        fn select_profile(&mut self, profile: &UserProfile) {
            self.0.push(format!("select:{}", profile.id));
        }
        fn open_profile(&mut self, profile: &UserProfile) {
            self.0.push(format!("open:{}", profile.id));
        }
        fn fetch_more(&mut self) {
            self.0.push("more".to_string());
        }
    }

    #[test]
    fn loading_with_no_profiles_still_sections() {
        let mut list = UserList::new(vec![], Some(vec![ChannelMember::new("a", true)]));
        list.loading = true;
        assert_eq!(list.data().unwrap(), ListData::Sections(vec![]));
        assert!(list.show_loading_footer());
    }

    #[test]
    fn selection_stops_at_group_message_limit() {
        let mut list = UserList::new(vec![], None);
        for i in 0..MAX_USERS_IN_GM {
            let p = UserProfile::new(i.to_string(), format!("u{i}"));
            assert_eq!(list.selection.toggle(&p), SelectionChange::Added);
        }
        let extra = UserProfile::new("x", "extra");
        assert_eq!(list.selection.toggle(&extra), SelectionChange::Rejected);
        assert_eq!(list.selection.len(), MAX_USERS_IN_GM);
    }

    #[test]
    fn events_reach_the_handler_in_order() {
        let list = UserList::new(vec![UserProfile::new("a", "amy")], None);
        let mut calls = Calls::default();
        for ev in [ListEvent::Press("a".into()), ListEvent::LongPress("a".into()), ListEvent::EndReached] {
            list.dispatch(&ev, &mut calls);
        }
        assert_eq!(calls.0, vec!["select:a", "open:a", "more"]);
    }
}

#[cfg(test)]
mod emoji_tests {
    use roster::emoji::{EmojiCatalog, SkinTone, resolve_emoji_name};

    #[test]
    fn custom_catalog_controls_variants() {
        let mut catalog = EmojiCatalog::new(["party_parrot"]);
        assert_eq!(resolve_emoji_name("party_parrot", SkinTone::Dark, &catalog), "party_parrot");
        catalog.insert("party_parrot_dark_skin_tone");
        assert_eq!(
            resolve_emoji_name("party_parrot", SkinTone::Dark, &catalog),
            "party_parrot_dark_skin_tone"
        );
        assert_eq!(catalog.len(), 2);
    }
}
