use serenity::all::{GuildId, Http, Member, RoleId};
use tracing::{error, warn};

use crate::Error;

pub const TOP_ROLE_PREFIX: &str = "Top ";
pub const PP_ROLE_SUFFIX: &str = "pp";

const MILESTONES: [i32; 12] = [1, 5, 10, 25, 50, 100, 250, 500, 1000, 2500, 5000, 10000];
const PP_THRESHOLDS: [i32; 16] = [500, 1000, 2000, 3000, 4000, 5000, 6000, 7000, 8000, 9000, 10000, 11000, 12000, 13000, 14000, 15000];

/// The tightest "Top N" bracket a rank falls into.
pub fn milestone_for_rank(rank: i32) -> Option<i32> {
    if rank <= 0 {
        return None;
    }

    MILESTONES.iter().copied().find(|o| rank <= *o)
}

pub fn milestone_role_name(milestone: i32) -> String {
    format!("{TOP_ROLE_PREFIX}{milestone}")
}

pub fn is_new_milestone(rank: i32, member_role_names: &[String]) -> bool {
    match milestone_for_rank(rank) {
        Some(milestone) => {
            let role = milestone_role_name(milestone);
            !member_role_names.iter().any(|o| *o == role)
        }
        None => false
    }
}

pub fn pp_threshold_for(pp: f64) -> Option<i32> {
    PP_THRESHOLDS.iter().copied().filter(|o| pp >= *o as f64).last()
}

pub fn pp_role_name(threshold: i32) -> String {
    format!("{threshold}{PP_ROLE_SUFFIX}")
}

pub fn is_pp_role(name: &str) -> bool {
    name.strip_suffix(PP_ROLE_SUFFIX)
        .map(|o| !o.is_empty() && o.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

pub fn is_top_role(name: &str) -> bool {
    name.strip_prefix(TOP_ROLE_PREFIX)
        .map(|o| !o.is_empty() && o.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

pub async fn member_role_names(http: &Http, guild_id: GuildId, member: &Member) -> Result<Vec<String>, Error> {
    let roles = guild_id.roles(http).await?;
    Ok(member.roles.iter()
        .filter_map(|o| roles.get(o))
        .map(|o| o.name.clone())
        .collect())
}

/// Swaps every role of one family (`in_family`) on the member for the role called `wanted`.
/// Returns false if the server has no role with that name.
pub async fn assign_exclusive_role(http: &Http, guild_id: GuildId, member: &Member, wanted: &str, in_family: fn(&str) -> bool) -> Result<bool, Error> {
    let roles = guild_id.roles(http).await?;

    let Some(target) = roles.values().find(|o| o.name == wanted).map(|o| o.id) else {
        warn!("Guild {} has no role named \"{}\"", guild_id, wanted);
        return Ok(false);
    };

    let stale: Vec<RoleId> = member.roles.iter()
        .filter(|o| **o != target)
        .filter(|o| roles.get(*o).map(|r| in_family(&r.name)).unwrap_or(false))
        .copied()
        .collect();

    for role in stale {
        if let Err(ex) = member.remove_role(http, role).await {
            error!("Failed to remove role {} from {}: {}", role, member.user.id, ex);
        }
    }

    if !member.roles.contains(&target) {
        member.add_role(http, target).await?;
    }

    Ok(true)
}

pub async fn assign_milestone_role(http: &Http, guild_id: GuildId, member: &Member, rank: i32) -> Result<bool, Error> {
    match milestone_for_rank(rank) {
        Some(milestone) => assign_exclusive_role(http, guild_id, member, &milestone_role_name(milestone), is_top_role).await,
        None => Ok(false)
    }
}

pub async fn assign_pp_role(http: &Http, guild_id: GuildId, member: &Member, pp: f64) -> Result<Option<String>, Error> {
    match pp_threshold_for(pp) {
        Some(threshold) => {
            let name = pp_role_name(threshold);
            if assign_exclusive_role(http, guild_id, member, &name, is_pp_role).await? {
                Ok(Some(name))
            } else {
                Ok(None)
            }
        }
        None => Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milestones_round_up_to_the_next_bracket() {
        assert_eq!(milestone_for_rank(0), None);
        assert_eq!(milestone_for_rank(1), Some(1));
        assert_eq!(milestone_for_rank(2), Some(5));
        assert_eq!(milestone_for_rank(25), Some(25));
        assert_eq!(milestone_for_rank(26), Some(50));
        assert_eq!(milestone_for_rank(10000), Some(10000));
        assert_eq!(milestone_for_rank(10001), None);
    }

    #[test]
    fn new_milestone_only_when_role_is_missing() {
        let roles = vec!["Top 50".to_string(), "Mapper".to_string()];
        assert!(!is_new_milestone(30, &roles));
        assert!(is_new_milestone(20, &roles));
        assert!(!is_new_milestone(20_000, &roles));
        assert!(is_new_milestone(1, &[]));
    }

    #[test]
    fn pp_thresholds_round_down() {
        assert_eq!(pp_threshold_for(499.9), None);
        assert_eq!(pp_threshold_for(500.0), Some(500));
        assert_eq!(pp_threshold_for(4321.0), Some(4000));
        assert_eq!(pp_threshold_for(99999.0), Some(15000));
        assert_eq!(pp_role_name(4000), "4000pp");
    }

    #[test]
    fn role_families() {
        assert!(is_top_role("Top 100"));
        assert!(!is_top_role("Top Mapper"));
        assert!(is_pp_role("4000pp"));
        assert!(!is_pp_role("pp"));
        assert!(!is_pp_role("happ"));
    }
}
