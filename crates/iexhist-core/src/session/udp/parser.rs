use etherparse::{SlicedPacket, TransportSlice};
use pcap_parser::Linktype;

use super::error::UdpError;
use super::reader::UdpReader;

/// Extract the UDP datagram payload from a link-layer frame.
///
/// Returns `Ok(None)` when the frame is not UDP or uses a link type this
/// decoder does not handle.
pub fn udp_payload(linktype: Linktype, data: &[u8]) -> Result<Option<&[u8]>, UdpError> {
    let sliced = match linktype {
        Linktype::ETHERNET => {
            SlicedPacket::from_ethernet(data).map_err(|e| UdpError::Slice(e.to_string()))?
        }
        Linktype::RAW => SlicedPacket::from_ip(data).map_err(|e| UdpError::Slice(e.to_string()))?,
        _ => return Ok(None),
    };

    let net = sliced.net.ok_or(UdpError::MissingNetworkLayer)?;
    match sliced.transport {
        Some(TransportSlice::Udp(_)) => {}
        _ => return Ok(None),
    }

    let ip_payload = net.ip_payload_ref().ok_or(UdpError::MissingIpPayload)?;
    let reader = UdpReader::new(ip_payload.payload);
    Ok(Some(reader.payload_without_header()?))
}
