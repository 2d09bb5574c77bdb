// Volume operations

use crate::client::ReadyNasClient;
use crate::envelope::Resource;
use crate::error::Error;
use crate::models::VolumeInfo;
use crate::parse;

impl ReadyNasClient {
    /// Fetch all configured volumes with capacity figures and RAID
    /// layout. Unconfigured bays are not reported.
    pub async fn get_volumes(&self) -> Result<Vec<VolumeInfo>, Error> {
        self.read_resource(Resource::Volumes, parse::parse_volumes)
            .await
    }
}
