use serde::{Deserialize, Serialize};

use crate::Amount;

/// Chain specific state kept next to the balance, staking positions for now
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountResources {
    /// registered with the accounts contract, required before locking
    pub registered: bool,
    pub locked_balance: Amount,
    /// locked but not yet voting, what a vote or an unlock can use
    pub nonvoting_locked_balance: Amount,
    /// oldest first
    pub pending_withdrawals: Vec<PendingWithdrawal>,
    pub votes: Vec<Vote>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWithdrawal {
    pub index: u32,
    pub value: Amount,
    /// when the unlocked funds become withdrawable
    pub time: jiff::Timestamp,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    uniffi::Enum,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VoteType {
    Pending,
    Active,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub validator_group: String,
    pub amount: Amount,
    pub activatable: bool,
    pub revokable: bool,
    pub index: u32,
    pub vote_type: VoteType,
}

impl AccountResources {
    pub fn vote(&self, validator_group: &str, index: u32) -> Option<&Vote> {
        self.votes
            .iter()
            .find(|vote| vote.validator_group == validator_group && vote.index == index)
    }

    pub fn revokable_votes(&self) -> impl Iterator<Item = &Vote> {
        self.votes.iter().filter(|vote| vote.revokable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(group: &str, index: u32, vote_type: VoteType, revokable: bool) -> Vote {
        Vote {
            validator_group: group.to_string(),
            amount: Amount::from(10u64),
            activatable: false,
            revokable,
            index,
            vote_type,
        }
    }

    #[test]
    fn test_find_vote_by_group_and_index() {
        let resources = AccountResources {
            registered: true,
            locked_balance: Amount::from(30u64),
            nonvoting_locked_balance: Amount::from(10u64),
            pending_withdrawals: vec![],
            votes: vec![
                vote("0xgroup", 0, VoteType::Pending, true),
                vote("0xgroup", 1, VoteType::Active, false),
            ],
        };

        assert_eq!(resources.vote("0xgroup", 1).map(|v| v.vote_type), Some(VoteType::Active));
        assert_eq!(resources.vote("0xother", 0), None);
        assert_eq!(resources.revokable_votes().count(), 1);
    }
}
