pub mod storage;
pub mod supabase;

pub use storage::ClinicStore;
pub use supabase::SupabaseClient;
