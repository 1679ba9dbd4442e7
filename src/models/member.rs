//! Library member model

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AppError, AppResult};

/// Library member and the ISBNs they currently hold, in borrow order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    /// Identity key within a membership store
    pub member_id: String,
    pub email: String,
    #[serde(default)]
    borrowed_books: Vec<String>,
}

impl Member {
    pub fn new(name: impl Into<String>, member_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            member_id: member_id.into(),
            email: email.into(),
            borrowed_books: Vec::new(),
        }
    }

    pub fn borrowed_books(&self) -> &[String] {
        &self.borrowed_books
    }

    pub fn has_borrowed(&self, isbn: &str) -> bool {
        self.borrowed_books.iter().any(|b| b == isbn)
    }

    /// Record a borrowed ISBN; an ISBN is held at most once
    pub fn borrow_isbn(&mut self, isbn: &str) -> AppResult<()> {
        if self.has_borrowed(isbn) {
            return Err(AppError::DuplicateBorrow {
                isbn: isbn.to_string(),
                member: self.name.clone(),
            });
        }
        self.borrowed_books.push(isbn.to_string());
        Ok(())
    }

    /// Drop a returned ISBN, keeping the order of the others
    pub fn return_isbn(&mut self, isbn: &str) -> AppResult<()> {
        let position = self
            .borrowed_books
            .iter()
            .position(|b| b == isbn)
            .ok_or_else(|| AppError::NotBorrowedByMember {
                isbn: isbn.to_string(),
                member: self.name.clone(),
            })?;
        self.borrowed_books.remove(position);
        Ok(())
    }

    pub fn display(&self) -> String {
        format!("{} ({}) - {}", self.name, self.member_id, self.email)
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_borrow_isbn_keeps_order_and_rejects_duplicates() {
        let mut member = Member::new("Ada", "M001", "ada@example.com");
        member.borrow_isbn("111").unwrap();
        member.borrow_isbn("222").unwrap();
        member.borrow_isbn("333").unwrap();
        assert_eq!(member.borrowed_books(), ["111", "222", "333"]);

        let err = member.borrow_isbn("222").unwrap_err();
        assert!(matches!(err, AppError::DuplicateBorrow { ref isbn, .. } if isbn == "222"));
        assert_eq!(member.borrowed_books().len(), 3);

        member.return_isbn("222").unwrap();
        assert_eq!(member.borrowed_books(), ["111", "333"]);
    }

    #[test]
    fn test_return_isbn_not_held() {
        let mut member = Member::new("Ada", "M001", "ada@example.com");
        let err = member.return_isbn("999").unwrap_err();
        assert_eq!(err.to_string(), "Book with ISBN 999 is not borrowed by Ada.");
    }

    #[test]
    fn test_display() {
        let member = Member::new("Ada Lovelace", "M001", "ada@example.com");
        assert_eq!(member.to_string(), "Ada Lovelace (M001) - ada@example.com");
    }

    #[test]
    fn test_missing_borrowed_books_defaults_to_empty() {
        let member: Member = serde_json::from_value(json!({
            "name": "Ada", "member_id": "M001", "email": "ada@example.com"
        }))
        .unwrap();
        assert!(member.borrowed_books().is_empty());

        let value = serde_json::to_value(&member).unwrap();
        assert_eq!(value["borrowed_books"], json!([]));
    }
}
