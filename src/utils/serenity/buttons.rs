use poise::{
    serenity_prelude::{CreateActionRow, CreateButton},
    CreateReply,
};

pub trait AddButton: Sized {
    fn add_button(self, button: CreateButton) -> Self;
}

impl AddButton for CreateReply {
    fn add_button(mut self, button: CreateButton) -> Self {
        let rows = self.components.get_or_insert_with(Vec::new);

        if let Some(buttons) = rows.iter_mut().find_map(|row| match row {
            CreateActionRow::Buttons(buttons) => Some(buttons),
            _ => None,
        }) {
            buttons.push(button);
        } else {
            rows.push(CreateActionRow::Buttons(vec![button]));
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button_rows(reply: &CreateReply) -> Vec<usize> {
        reply
            .components
            .iter()
            .flatten()
            .map(|row| match row {
                CreateActionRow::Buttons(buttons) => buttons.len(),
                _ => 0,
            })
            .collect()
    }

    #[test]
    fn buttons_share_a_row() {
        let reply = CreateReply::default()
            .add_button(CreateButton::new("a"))
            .add_button(CreateButton::new("b"));

        assert_eq!(button_rows(&reply), [2]);
    }
}
