use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::redis::RedisClient;
use adapter::repository::auth::AuthRepositoryImpl;
use adapter::repository::health::HealthCheckRepositoryImpl;
use adapter::repository::item::ItemRepositoryImpl;
use adapter::repository::payment::PaymentRepositoryImpl;
use adapter::repository::rental::RentalRepositoryImpl;
use adapter::repository::review::ReviewRepositoryImpl;
use adapter::repository::user::UserRepositoryImpl;
use kernel::gateway::payment::PaymentGateway;
use kernel::repository::auth::AuthRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::item::ItemRepository;
use kernel::repository::payment::PaymentRepository;
use kernel::repository::rental::RentalRepository;
use kernel::repository::review::ReviewRepository;
use kernel::repository::user::UserRepository;
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    user_repository: Arc<dyn UserRepository>,
    item_repository: Arc<dyn ItemRepository>,
    rental_repository: Arc<dyn RentalRepository>,
    payment_repository: Arc<dyn PaymentRepository>,
    review_repository: Arc<dyn ReviewRepository>,
    auth_repository: Arc<dyn AuthRepository>,
}

impl AppRegistry {
    pub fn new(
        pool: ConnectionPool,
        redis_client: Arc<RedisClient>,
        payment_gateway: Arc<dyn PaymentGateway>,
        app_config: AppConfig,
    ) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let item_repository = Arc::new(ItemRepositoryImpl::new(pool.clone()));
        let rental_repository = Arc::new(RentalRepositoryImpl::new(pool.clone()));
        let payment_repository =
            Arc::new(PaymentRepositoryImpl::new(pool.clone(), payment_gateway));
        let review_repository = Arc::new(ReviewRepositoryImpl::new(pool.clone()));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(
            pool.clone(),
            redis_client.clone(),
            app_config.auth.ttl,
        ));
        Self {
            health_check_repository,
            user_repository,
            item_repository,
            rental_repository,
            payment_repository,
            review_repository,
            auth_repository,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn item_repository(&self) -> Arc<dyn ItemRepository> {
        self.item_repository.clone()
    }

    pub fn rental_repository(&self) -> Arc<dyn RentalRepository> {
        self.rental_repository.clone()
    }

    pub fn payment_repository(&self) -> Arc<dyn PaymentRepository> {
        self.payment_repository.clone()
    }

    pub fn review_repository(&self) -> Arc<dyn ReviewRepository> {
        self.review_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }
}
