//! Question Bank
//!
//! Ordered, read-only collection of test items. The simulator only needs
//! index-based difficulty lookup and the item count; parsing the bank from
//! storage is left to the caller (the types derive `Deserialize` for that).

use serde::{Deserialize, Serialize};

use crate::error::{CatError, Result};

/// A single test item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    /// Nominally in [0, 1], not enforced
    pub difficulty: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<String>, difficulty: f64) -> Self {
        Self {
            id: id.into(),
            difficulty,
            text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Item>", into = "Vec<Item>")]
pub struct QuestionBank {
    items: Vec<Item>,
}

impl QuestionBank {
    /// Build a bank, rejecting an empty item list or non-finite difficulties.
    pub fn new(items: Vec<Item>) -> Result<Self> {
        if items.is_empty() {
            return Err(CatError::EmptyQuestionBank);
        }
        if let Some((index, item)) = items
            .iter()
            .enumerate()
            .find(|(_, item)| !item.difficulty.is_finite())
        {
            return Err(CatError::InvalidDifficulty {
                index,
                value: item.difficulty,
            });
        }
        Ok(Self { items })
    }

    /// Build a bank from bare difficulties; ids are the positional indices.
    pub fn from_difficulties(difficulties: &[f64]) -> Result<Self> {
        Self::new(
            difficulties
                .iter()
                .enumerate()
                .map(|(i, &d)| Item::new(i.to_string(), d))
                .collect(),
        )
    }

    pub fn n_items(&self) -> usize {
        self.items.len()
    }

    pub fn item_at(&self, index: usize) -> Result<&Item> {
        self.items.get(index).ok_or(CatError::InvalidAction {
            action: index,
            n_items: self.items.len(),
        })
    }

    pub fn difficulty_at(&self, index: usize) -> Result<f64> {
        self.item_at(index).map(|item| item.difficulty)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }
}

impl TryFrom<Vec<Item>> for QuestionBank {
    type Error = CatError;

    fn try_from(items: Vec<Item>) -> Result<Self> {
        Self::new(items)
    }
}

impl From<QuestionBank> for Vec<Item> {
    fn from(bank: QuestionBank) -> Self {
        bank.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty() {
        assert_eq!(QuestionBank::new(vec![]), Err(CatError::EmptyQuestionBank));
    }

    #[test]
    fn test_new_rejects_non_finite_difficulty() {
        let items = vec![Item::new("a", 0.2), Item::new("b", f64::NAN)];
        match QuestionBank::new(items) {
            Err(CatError::InvalidDifficulty { index, value }) => {
                assert_eq!(index, 1);
                assert!(value.is_nan());
            }
            other => panic!("expected InvalidDifficulty, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_difficulty_is_accepted() {
        // [0, 1] is nominal only
        let bank = QuestionBank::from_difficulties(&[-0.5, 1.5]).unwrap();
        assert_eq!(bank.difficulty_at(1).unwrap(), 1.5);
    }

    #[test]
    fn test_item_at_bounds_checked() {
        let bank = QuestionBank::from_difficulties(&[0.1, 0.2, 0.3]).unwrap();
        assert_eq!(bank.n_items(), 3);
        assert_eq!(bank.item_at(2).unwrap().id, "2");
        assert_eq!(
            bank.item_at(3),
            Err(CatError::InvalidAction {
                action: 3,
                n_items: 3
            })
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"[{"id": "q1", "difficulty": 0.4, "text": "2 + 2 = ?"}, {"id": "q2", "difficulty": 0.9}]"#;
        let bank: QuestionBank = serde_json::from_str(json).unwrap();
        assert_eq!(bank.n_items(), 2);
        assert_eq!(bank.items()[0].text.as_deref(), Some("2 + 2 = ?"));
        assert!(bank.items()[1].text.is_none());

        assert!(serde_json::from_str::<QuestionBank>("[]").is_err());
    }
}
