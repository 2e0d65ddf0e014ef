//! Order Repositories

mod items;
mod loyalty;
mod orders;
mod redemptions;
mod stock;

pub(crate) use items::PgOrderItemsRepository;
pub(crate) use loyalty::PgLoyaltyRepository;
pub(crate) use orders::PgOrdersRepository;
pub(crate) use redemptions::PgRedemptionsRepository;
pub(crate) use stock::PgStockRepository;
