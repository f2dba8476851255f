use crate::domain::catalog::FarmerId;

/// The set of sellers a shopper has favorited, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    farmers: Vec<FarmerId>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership and returns whether the farmer is now a favorite.
    pub fn toggle(&mut self, farmer_id: &FarmerId) -> bool {
        match self.farmers.iter().position(|id| id == farmer_id) {
            Some(index) => {
                self.farmers.remove(index);
                false
            }
            None => {
                self.farmers.push(farmer_id.clone());
                true
            }
        }
    }

    pub fn is_favorite(&self, farmer_id: &FarmerId) -> bool {
        self.farmers.contains(farmer_id)
    }

    pub fn farmers(&self) -> &[FarmerId] {
        &self.farmers
    }

    pub fn len(&self) -> usize {
        self.farmers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.farmers.is_empty()
    }
}
