use crate::messages::{NewBudget, NewCategory, NewExpense};

pub const MAX_LABEL_LENGTH: usize = 50;
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

#[derive(Debug)]
pub enum Validity {
    Valid,
    Invalid(String),
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        match &self {
            Validity::Valid => true,
            Validity::Invalid(_) => false,
        }
    }
}

pub fn validate_amount(field_name: &str, amount: f64) -> Validity {
    if !amount.is_finite() || amount <= 0.0 {
        return Validity::Invalid(format!("{field_name} must be greater than zero."));
    }

    Validity::Valid
}

pub fn validate_length(field_name: &str, value: &str, min: usize, max: usize) -> Validity {
    let len = value.chars().count();

    if len < min {
        return Validity::Invalid(format!(
            "{field_name} must be at least {min} character(s) long."
        ));
    }

    if len > max {
        return Validity::Invalid(format!(
            "{field_name} cannot be longer than {max} characters."
        ));
    }

    Validity::Valid
}

/// Accepts colors of the form `#RRGGBB`.
pub fn validate_color(color: &str) -> Validity {
    let Some(hex) = color.strip_prefix('#') else {
        return Validity::Invalid(String::from("Color must begin with a pound sign (#)."));
    };

    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Validity::Invalid(String::from(
            "Color must be six hexadecimal digits in the form #RRGGBB.",
        ));
    }

    Validity::Valid
}

pub fn validate_new_expense(expense: &NewExpense) -> Validity {
    if let Validity::Invalid(msg) = validate_amount("Amount", expense.amount) {
        return Validity::Invalid(msg);
    }

    if let Validity::Invalid(msg) =
        validate_length("Category", &expense.category, 1, MAX_LABEL_LENGTH)
    {
        return Validity::Invalid(msg);
    }

    if let Some(description) = &expense.description {
        if let Validity::Invalid(msg) =
            validate_length("Description", description, 0, MAX_DESCRIPTION_LENGTH)
        {
            return Validity::Invalid(msg);
        }
    }

    Validity::Valid
}

pub fn validate_new_category(category: &NewCategory) -> Validity {
    if let Validity::Invalid(msg) = validate_length("Name", &category.name, 1, MAX_LABEL_LENGTH) {
        return Validity::Invalid(msg);
    }

    if let Validity::Invalid(msg) = validate_color(&category.color) {
        return Validity::Invalid(msg);
    }

    if let Some(icon) = &category.icon {
        if let Validity::Invalid(msg) = validate_length("Icon", icon, 0, MAX_LABEL_LENGTH) {
            return Validity::Invalid(msg);
        }
    }

    Validity::Valid
}

pub fn validate_new_budget(budget: &NewBudget) -> Validity {
    if let Validity::Invalid(msg) = validate_length("Name", &budget.name, 1, MAX_LABEL_LENGTH) {
        return Validity::Invalid(msg);
    }

    if let Validity::Invalid(msg) = validate_amount("Amount", budget.amount) {
        return Validity::Invalid(msg);
    }

    if let Some(category) = &budget.category {
        if let Validity::Invalid(msg) = validate_length("Category", category, 0, MAX_LABEL_LENGTH)
        {
            return Validity::Invalid(msg);
        }
    }

    Validity::Valid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("Amount", 0.01).is_valid());
        assert!(validate_amount("Amount", 25.0).is_valid());
        assert!(validate_amount("Amount", 1_000_000.0).is_valid());

        assert!(!validate_amount("Amount", 0.0).is_valid());
        assert!(!validate_amount("Amount", -0.0).is_valid());
        assert!(!validate_amount("Amount", -50.0).is_valid());
        assert!(!validate_amount("Amount", f64::NAN).is_valid());
        assert!(!validate_amount("Amount", f64::INFINITY).is_valid());
    }

    #[test]
    fn test_validate_length() {
        assert!(validate_length("Category", "Food", 1, 50).is_valid());
        assert!(validate_length("Category", &"a".repeat(50), 1, 50).is_valid());
        assert!(validate_length("Description", "", 0, 200).is_valid());

        // Length is counted in characters rather than bytes
        assert!(validate_length("Icon", &"🍔".repeat(50), 0, 50).is_valid());

        assert!(!validate_length("Category", "", 1, 50).is_valid());
        assert!(!validate_length("Category", &"a".repeat(51), 1, 50).is_valid());
        assert!(!validate_length("Description", &"x".repeat(201), 0, 200).is_valid());
    }

    #[test]
    fn test_validate_color() {
        assert!(validate_color("#FF6B6B").is_valid());
        assert!(validate_color("#00ff00").is_valid());
        assert!(validate_color("#aBc123").is_valid());

        assert!(!validate_color("FF6B6B").is_valid());
        assert!(!validate_color("#FF6B6").is_valid());
        assert!(!validate_color("#FF6B6B0").is_valid());
        assert!(!validate_color("#GG6B6B").is_valid());
        assert!(!validate_color("").is_valid());
        assert!(!validate_color("#").is_valid());
        assert!(!validate_color("#ＦF6B6B").is_valid());
    }

    #[test]
    fn test_validate_new_expense() {
        let mut expense = NewExpense {
            amount: 12.5,
            category: String::from("Food"),
            description: Some(String::from("Lunch")),
            date: None,
        };
        assert!(validate_new_expense(&expense).is_valid());

        expense.description = None;
        assert!(validate_new_expense(&expense).is_valid());

        expense.amount = -1.0;
        assert!(!validate_new_expense(&expense).is_valid());

        expense.amount = 1.0;
        expense.category = String::new();
        assert!(!validate_new_expense(&expense).is_valid());

        expense.category = String::from("Food");
        expense.description = Some("d".repeat(201));
        assert!(!validate_new_expense(&expense).is_valid());
    }

    #[test]
    fn test_validate_new_category() {
        let mut category = NewCategory {
            name: String::from("Travel"),
            color: String::from("#123ABC"),
            icon: None,
        };
        assert!(validate_new_category(&category).is_valid());

        category.color = String::from("blue");
        assert!(!validate_new_category(&category).is_valid());

        category.color = String::from("#123ABC");
        category.name = "n".repeat(51);
        assert!(!validate_new_category(&category).is_valid());

        category.name = String::from("Travel");
        category.icon = Some("i".repeat(51));
        assert!(!validate_new_category(&category).is_valid());
    }

    #[test]
    fn test_validate_new_budget() {
        let mut budget = NewBudget {
            name: String::from("Groceries"),
            amount: 200.0,
            category: Some(String::from("Food")),
            user_id: None,
        };
        assert!(validate_new_budget(&budget).is_valid());

        budget.amount = 0.0;
        assert!(!validate_new_budget(&budget).is_valid());

        budget.amount = 200.0;
        budget.name = String::new();
        assert!(!validate_new_budget(&budget).is_valid());

        budget.name = String::from("Groceries");
        budget.category = Some("c".repeat(51));
        assert!(!validate_new_budget(&budget).is_valid());
    }
}
